use super::function::Function;
use super::runtime::AUTORUN;
use super::{ForNext, Host, Runtime, Type};
use crate::error;
use crate::lang::{Error, Token, MAX_IDENT_LEN};

type Result<T> = std::result::Result<T, Error>;

/// ## Statements
///
/// Every statement is parsed the same way whether or not it executes.
/// Checking a line before it runs or is stored uses the same code with
/// side effects switched off.

impl<H: Host> Runtime<H> {
    /// Parses statements until the end of the line, a jump, or the
    /// target statement of a jump within a line.
    pub(super) fn parse_stmts(&mut self) -> Result<()> {
        self.ctx.break_line = false;
        self.ctx.jump_line = 0;
        self.ctx.jump_stmt = 0;
        while self.cursor.token != Token::Eol {
            if self.ctx.executing {
                self.arena.reset_stack();
            }
            let mut need_separator = true;
            match self.cursor.token {
                Token::Print => self.parse_print()?,
                Token::Let => {
                    self.next_token()?;
                    self.parse_assignment(false)?;
                }
                Token::Ident => self.parse_assignment(false)?,
                Token::Input => {
                    self.next_token()?;
                    self.parse_assignment(true)?;
                }
                Token::List => self.parse_list()?,
                Token::Run => self.parse_run()?,
                Token::Goto => self.parse_goto()?,
                Token::Gosub => self.parse_gosub()?,
                Token::Rem => {
                    if self.next_token()? == Token::String {
                        self.next_token()?;
                    }
                }
                Token::If => {
                    self.parse_if()?;
                    need_separator = false;
                }
                Token::For => self.parse_for()?,
                Token::Next => self.parse_next()?,
                Token::Dim => self.parse_dim()?,
                Token::Pause => self.parse_pause()?,
                Token::Position | Token::Pin | Token::PinMode => self.parse_two_args()?,
                Token::Load | Token::Save | Token::Delete => self.parse_storage()?,
                Token::New
                | Token::Stop
                | Token::Cont
                | Token::Return
                | Token::Cls
                | Token::Dir => self.parse_simple()?,
                _ => return Err(error!(BadCommand)),
            }

            if self.ctx.break_line
                || self.ctx.end_run
                || self.ctx.jump_line != 0
                || self.ctx.jump_stmt != 0
            {
                return Ok(());
            }
            if self.cursor.token != Token::Eol && need_separator {
                if self.cursor.token != Token::Colon {
                    return Err(error!(BadCommand));
                }
                if self.next_token()? == Token::Eol {
                    return Err(error!(BadCommand));
                }
            }
            self.ctx.stmt += 1;
            if self.ctx.stmt == self.ctx.target_stmt {
                return Ok(());
            }
        }
        Ok(())
    }

    fn parse_print(&mut self) -> Result<()> {
        self.next_token()?;
        let mut new_line = true;
        while !self.cursor.token.ends_statement() {
            let ty = self.parse_expression()?;
            if self.ctx.executing {
                match ty {
                    Type::Number => {
                        let val = self.arena.pop_num();
                        self.host.output_float(val);
                    }
                    Type::String => {
                        let text = self.arena.pop_str();
                        self.host.output_str(self.arena.bytes(text));
                    }
                }
            }
            new_line = true;
            if self.cursor.token == Token::Semicolon {
                new_line = false;
                self.next_token()?;
            }
        }
        if self.ctx.executing {
            if new_line {
                self.host.new_line();
            }
            self.host.flush();
        }
        Ok(())
    }

    /// `[LET] name[(i, ..)] = expr` or, for INPUT, a value read from the host.
    fn parse_assignment(&mut self, input: bool) -> Result<()> {
        if self.cursor.token != Token::Ident {
            return Err(error!(UnexpectedToken));
        }
        let ident = self.cursor.ident;
        self.next_token()?;
        let is_array = self.cursor.token == Token::LParen;
        if is_array {
            self.parse_subscript()?;
        }
        let ty = if input {
            if self.ctx.executing {
                let line = self.host.read_line();
                let line = match line.find('\0') {
                    Some(end) => &line[..end],
                    None => &line[..],
                };
                if ident.is_string() {
                    self.arena.push_str(line.as_bytes())?;
                } else {
                    self.arena.push_num(Function::leading_number(line))?;
                }
            }
            if ident.is_string() {
                Type::String
            } else {
                Type::Number
            }
        } else {
            if self.cursor.token != Token::Equal {
                return Err(error!(UnexpectedToken));
            }
            self.next_token()?;
            self.parse_expression()?
        };
        match (ident.is_string(), ty) {
            (false, Type::String) => return Err(error!(ExpectedNumeric)),
            (true, Type::Number) => return Err(error!(ExpectedString)),
            _ => {}
        }
        if !self.ctx.executing {
            return Ok(());
        }
        match (ident.is_string(), is_array) {
            (false, false) => {
                let val = self.arena.pop_num();
                self.arena.store_num(&ident, val)
            }
            (false, true) => {
                let val = self.arena.pop_num();
                self.arena.store_num_element(&ident, val)
            }
            (true, false) => self.arena.store_str(&ident),
            (true, true) => self.arena.store_str_element(&ident),
        }
    }

    /// Line number argument of GOTO and GOSUB. The line must exist.
    fn target_line(&self, val: f32) -> Result<u16> {
        let n = val as i32;
        if n < 1 || n > u16::MAX as i32 {
            return Err(error!(BadLineNum));
        }
        let n = n as u16;
        let at = self.arena.find_line(n);
        if self.arena.is_program_end(at) || self.arena.line_number_at(at) != n {
            return Err(error!(BadLineNum));
        }
        Ok(n)
    }

    fn parse_goto(&mut self) -> Result<()> {
        self.next_token()?;
        self.expect_number()?;
        if self.ctx.executing {
            let val = self.arena.pop_num();
            self.ctx.jump_line = self.target_line(val)?;
        }
        Ok(())
    }

    fn parse_gosub(&mut self) -> Result<()> {
        self.next_token()?;
        self.expect_number()?;
        if self.ctx.executing {
            let val = self.arena.pop_num();
            let line = self.target_line(val)?;
            self.arena.push_gosub(self.ctx.line, self.ctx.stmt)?;
            self.ctx.jump_line = line;
        }
        Ok(())
    }

    fn parse_run(&mut self) -> Result<()> {
        self.next_token()?;
        let mut start = 1;
        if !self.cursor.token.ends_statement() {
            self.expect_number()?;
            if self.ctx.executing {
                let n = self.arena.pop_num() as i32;
                if n < 1 || n > u16::MAX as i32 {
                    return Err(error!(BadLineNum));
                }
                start = n as u16;
            }
        }
        if self.ctx.executing {
            self.arena.clear_variables();
            self.ctx.stop = None;
            self.ctx.jump_line = start;
        }
        Ok(())
    }

    /// `LIST [first][,last]`
    fn parse_list(&mut self) -> Result<()> {
        self.next_token()?;
        let mut first = 0;
        let mut last = 0;
        if !self.cursor.token.ends_statement() {
            self.expect_number()?;
            if self.ctx.executing {
                first = self.arena.pop_num() as u16;
            }
            if self.cursor.token == Token::Comma {
                self.next_token()?;
                self.expect_number()?;
                if self.ctx.executing {
                    last = self.arena.pop_num() as u16;
                }
            }
        }
        if self.ctx.executing {
            self.list_program(first, last);
            self.host.flush();
        }
        Ok(())
    }

    fn parse_if(&mut self) -> Result<()> {
        self.next_token()?;
        self.expect_number()?;
        if self.cursor.token != Token::Then {
            return Err(error!(MissingThen));
        }
        self.next_token()?;
        if self.ctx.executing && self.arena.pop_num() == 0.0 {
            self.ctx.break_line = true;
        }
        Ok(())
    }

    /// `FOR v = start TO end [STEP step]`
    fn parse_for(&mut self) -> Result<()> {
        self.next_token()?;
        if self.cursor.token != Token::Ident || self.cursor.ident.is_string() {
            return Err(error!(UnexpectedToken));
        }
        let ident = self.cursor.ident;
        if self.next_token()? != Token::Equal {
            return Err(error!(UnexpectedToken));
        }
        self.next_token()?;
        self.expect_number()?;
        if self.cursor.token != Token::To {
            return Err(error!(UnexpectedToken));
        }
        self.next_token()?;
        self.expect_number()?;
        let has_step = self.cursor.token == Token::Step;
        if has_step {
            self.next_token()?;
            self.expect_number()?;
        }
        if self.ctx.executing {
            let step = if has_step { self.arena.pop_num() } else { 1.0 };
            let end = self.arena.pop_num();
            let val = self.arena.pop_num();
            let state = ForNext {
                val,
                step,
                end,
                line: self.ctx.line,
                stmt: self.ctx.stmt,
            };
            self.arena.store_for_next(&ident, &state)?;
        }
        Ok(())
    }

    /// Steps the loop counter and jumps back to the statement after FOR
    /// while the loop continues.
    fn parse_next(&mut self) -> Result<()> {
        self.next_token()?;
        if self.cursor.token != Token::Ident || self.cursor.ident.is_string() {
            return Err(error!(UnexpectedToken));
        }
        if self.ctx.executing {
            let ident = self.cursor.ident;
            let mut state = self.arena.lookup_for_next(&ident)?;
            state.val += state.step;
            self.arena.store_num(&ident, state.val)?;
            if state.continues() {
                self.ctx.jump_line = state.line;
                self.ctx.jump_stmt = state.stmt + 1;
            }
        }
        self.next_token()?;
        Ok(())
    }

    fn parse_dim(&mut self) -> Result<()> {
        self.next_token()?;
        if self.cursor.token != Token::Ident {
            return Err(error!(UnexpectedToken));
        }
        let ident = self.cursor.ident;
        if self.next_token()? != Token::LParen {
            return Err(error!(MissingBracket));
        }
        self.parse_subscript()?;
        if self.ctx.executing {
            self.arena.create_array(&ident)?;
        }
        Ok(())
    }

    fn parse_pause(&mut self) -> Result<()> {
        self.next_token()?;
        self.expect_number()?;
        if self.ctx.executing {
            let ms = self.arena.pop_num() as i64;
            if ms < 0 {
                return Err(error!(BadParameter));
            }
            self.host.sleep(ms.min(u32::MAX as i64) as u32);
        }
        Ok(())
    }

    /// POSITION x,y and PIN / PINMODE pin,value.
    fn parse_two_args(&mut self) -> Result<()> {
        let op = self.cursor.token;
        self.next_token()?;
        self.expect_number()?;
        if self.cursor.token != Token::Comma {
            return Err(error!(UnexpectedToken));
        }
        self.next_token()?;
        self.expect_number()?;
        if self.ctx.executing {
            let second = self.arena.pop_num() as i32;
            let first = self.arena.pop_num() as i32;
            match op {
                Token::Position => self.host.move_cursor(first, second),
                Token::Pin => self.host.digital_write(first, second),
                _ => self.host.pin_mode(first, second),
            }
        }
        Ok(())
    }

    /// `SAVE[+]`, `LOAD`, and the named forms `SAVE "x"`, `LOAD "x"`,
    /// `DELETE "x"`.
    fn parse_storage(&mut self) -> Result<()> {
        let op = self.cursor.token;
        self.next_token()?;
        let mut autorun = false;
        let mut named = false;
        if op == Token::Save && self.cursor.token == Token::Plus {
            self.next_token()?;
            autorun = true;
        } else if !self.cursor.token.ends_statement() {
            self.expect_string()?;
            named = true;
        }
        if !self.ctx.executing {
            return Ok(());
        }
        if named {
            let text = self.arena.pop_str();
            if text.len() > MAX_IDENT_LEN {
                return Err(error!(BadParameter));
            }
            let name = String::from_utf8_lossy(self.arena.bytes(text)).into_owned();
            return match op {
                Token::Save => {
                    if !self.host.save_named(&name, self.arena.program_bytes()) {
                        return Err(error!(OutOfMemory));
                    }
                    Ok(())
                }
                Token::Load => {
                    let image = self
                        .host
                        .load_named(&name)
                        .ok_or_else(|| error!(BadParameter))?;
                    self.load_image(&image)
                }
                _ => {
                    if !self.host.delete_named(&name) {
                        return Err(error!(BadParameter));
                    }
                    Ok(())
                }
            };
        }
        match op {
            Token::Save => {
                let program = self.arena.program_bytes();
                let mut image = Vec::with_capacity(program.len() + 1);
                image.push(if autorun { AUTORUN } else { 0 });
                image.extend_from_slice(program);
                if !self.host.save_program(&image) {
                    return Err(error!(OutOfMemory));
                }
                Ok(())
            }
            Token::Load => {
                let image = self
                    .host
                    .load_program()
                    .ok_or_else(|| error!(BadParameter))?;
                match image.get(1..) {
                    Some(program) => self.load_image(program),
                    None => Err(error!(BadParameter)),
                }
            }
            _ => Err(error!(BadCommand)),
        }
    }

    /// Replaces the program. A running program stops.
    fn load_image(&mut self, program: &[u8]) -> Result<()> {
        self.reset();
        self.arena.load_program(program)?;
        if self.ctx.line != 0 {
            self.ctx.end_run = true;
        }
        Ok(())
    }

    /// Statements without arguments.
    fn parse_simple(&mut self) -> Result<()> {
        let op = self.cursor.token;
        self.next_token()?;
        if !self.ctx.executing {
            return Ok(());
        }
        match op {
            Token::New => {
                self.reset();
                self.ctx.break_line = true;
                self.ctx.end_run = true;
            }
            Token::Stop => {
                if self.ctx.line != 0 {
                    self.ctx.stop = Some((self.ctx.line, self.ctx.stmt));
                }
                return Err(error!(Stop));
            }
            Token::Cont => {
                if let Some((line, stmt)) = self.ctx.stop.take() {
                    self.ctx.jump_line = line;
                    self.ctx.jump_stmt = stmt + 1;
                }
            }
            Token::Return => match self.arena.pop_gosub() {
                Some((line, stmt)) => {
                    self.ctx.jump_line = line;
                    self.ctx.jump_stmt = stmt + 1;
                }
                None => return Err(error!(ReturnWithoutGosub)),
            },
            Token::Cls => {
                self.host.cls();
                self.host.flush();
            }
            _ => self.host.list_programs(),
        }
        Ok(())
    }
}
