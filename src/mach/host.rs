/// ## Host capabilities
///
/// Everything the interpreter does to the outside world goes through
/// this trait. Only character output, new lines and line input are
/// required; the rest default to doing nothing.
pub trait Host {
    fn output_char(&mut self, ch: u8);

    fn output_str(&mut self, s: &[u8]) {
        for &ch in s {
            self.output_char(ch);
        }
    }

    fn output_int(&mut self, num: i32) {
        self.output_str(num.to_string().as_bytes());
    }

    fn output_float(&mut self, num: f32) {
        self.output_str(format_float(num).as_bytes());
    }

    fn new_line(&mut self);

    /// Called after PRINT and LIST so a buffered display can redraw.
    fn flush(&mut self) {}

    fn cls(&mut self) {}

    fn move_cursor(&mut self, _x: i32, _y: i32) {}

    /// Blocks until a full line of input is available.
    fn read_line(&mut self) -> String;

    /// One buffered key press, cleared by reading.
    fn get_key(&mut self) -> Option<u8> {
        None
    }

    /// Polled between statements. True aborts the run with BREAK.
    fn interrupted(&mut self) -> bool {
        false
    }

    fn digital_read(&mut self, _pin: i32) -> i32 {
        0
    }

    fn analog_read(&mut self, _pin: i32) -> i32 {
        0
    }

    fn pin_mode(&mut self, _pin: i32, _mode: i32) {}

    fn digital_write(&mut self, _pin: i32, _value: i32) {}

    fn sleep(&mut self, _ms: u32) {}

    /// Stores the default program slot. The first byte of `image` is the
    /// autorun flag, the rest is the program region.
    fn save_program(&mut self, _image: &[u8]) -> bool {
        false
    }

    fn load_program(&mut self) -> Option<Vec<u8>> {
        None
    }

    fn save_named(&mut self, _name: &str, _image: &[u8]) -> bool {
        false
    }

    fn load_named(&mut self, _name: &str) -> Option<Vec<u8>> {
        None
    }

    fn delete_named(&mut self, _name: &str) -> bool {
        false
    }

    /// Prints the names of stored programs.
    fn list_programs(&mut self) {}
}

/// Formats a float with seven significant digits.
///
/// Zero is `0`. Values that round below 0.0001 or to one million and up
/// use exponent form like `1.5E7`. Trailing zeros are trimmed.
pub fn format_float(num: f32) -> String {
    if num == 0.0 {
        return "0".to_string();
    }
    if !num.is_finite() {
        return num.to_string().to_uppercase();
    }
    let sci = format!("{:.6e}", num);
    let (mantissa, exp) = match sci.find('e') {
        Some(e) => (&sci[..e], sci[e + 1..].parse::<i32>().unwrap_or(0)),
        None => (&sci[..], 0),
    };
    if exp < -4 || exp >= 6 {
        return format!("{}E{}", trim_fraction(mantissa), exp);
    }
    let decimals = (6 - exp) as usize;
    let s = format!("{:.*}", decimals, num);
    trim_fraction(&s).to_string()
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
