use super::LineNumber;

/// ## Interpreter error
///
/// Errors are small integer codes. A program line number is attached
/// when the error happened while running stored program text.

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: LineNumber,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: "",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            code: self.code,
            line_number: line,
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    BadNumber = 1,
    LineTooLong = 2,
    UnexpectedInput = 3,
    UnterminatedString = 4,
    MissingBracket = 5,
    UnexpectedToken = 6,
    ExpectedNumeric = 7,
    ExpectedString = 8,
    LineNumTooBig = 9,
    OutOfMemory = 10,
    DivisionByZero = 11,
    VariableNotFound = 12,
    BadCommand = 13,
    BadLineNum = 14,
    BreakPressed = 15,
    NextWithoutFor = 16,
    Stop = 17,
    MissingThen = 18,
    ReturnWithoutGosub = 19,
    WrongArrayDimensions = 20,
    ArraySubscriptOutOfRange = 21,
    StringSubscriptOutOfRange = 22,
    ErrorInValInput = 23,
    BadParameter = 24,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        use ErrorCode::*;
        match self {
            BadNumber => "BAD NUMBER",
            LineTooLong => "LINE TOO LONG",
            UnexpectedInput => "UNEXPECTED INPUT",
            UnterminatedString => "UNTERMINATED STRING",
            MissingBracket => "MISSING BRACKET",
            UnexpectedToken => "ERROR IN EXPR",
            ExpectedNumeric => "NUMERIC EXPR EXPECTED",
            ExpectedString => "STRING EXPR EXPECTED",
            LineNumTooBig => "LINE NUMBER TOO BIG",
            OutOfMemory => "OUT OF MEMORY",
            DivisionByZero => "DIV BY ZERO",
            VariableNotFound => "VARIABLE NOT FOUND",
            BadCommand => "BAD COMMAND",
            BadLineNum => "BAD LINE NUMBER",
            BreakPressed => "BREAK PRESSED",
            NextWithoutFor => "NEXT WITHOUT FOR",
            Stop => "STOP STATEMENT",
            MissingThen => "MISSING THEN IN IF",
            ReturnWithoutGosub => "RETURN WITHOUT GOSUB",
            WrongArrayDimensions => "WRONG ARRAY DIMS",
            ArraySubscriptOutOfRange => "BAD ARRAY INDEX",
            StringSubscriptOutOfRange => "BAD STRING INDEX",
            ErrorInValInput => "ERROR IN VAL INPUT",
            BadParameter => "BAD PARAMETER",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.is_empty() {
            write!(f, "{}", self.code.as_str())
        } else if self.line_number.is_some() {
            write!(f, "{} IN{}", self.code.as_str(), suffix)
        } else {
            write!(f, "{}{}", self.code.as_str(), suffix)
        }
    }
}

impl std::error::Error for Error {}
