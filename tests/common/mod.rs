#![allow(dead_code)]
use basic::mach::{Host, Runtime};
use std::collections::{HashMap, VecDeque};

/// Records everything the interpreter does to the outside world.
#[derive(Default)]
pub struct TestHost {
    pub out: String,
    pub input: VecDeque<String>,
    pub key: Option<u8>,
    pub pins: HashMap<i32, i32>,
    pub pin_modes: Vec<(i32, i32)>,
    pub cursor: Option<(i32, i32)>,
    pub slept: u32,
    pub slot: Option<Vec<u8>>,
    pub named: HashMap<String, Vec<u8>>,
    /// Polls left before BREAK is reported.
    pub break_after: Option<usize>,
}

impl Host for TestHost {
    fn output_char(&mut self, ch: u8) {
        self.out.push(ch as char);
    }

    fn new_line(&mut self) {
        self.out.push('\n');
    }

    fn cls(&mut self) {
        self.out.push_str("<CLS>");
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn read_line(&mut self) -> String {
        self.input.pop_front().unwrap_or_default()
    }

    fn get_key(&mut self) -> Option<u8> {
        self.key.take()
    }

    fn interrupted(&mut self) -> bool {
        match self.break_after {
            Some(0) => true,
            Some(ref mut n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }

    fn digital_read(&mut self, pin: i32) -> i32 {
        self.pins.get(&pin).copied().unwrap_or(0)
    }

    fn analog_read(&mut self, pin: i32) -> i32 {
        self.pins.get(&pin).copied().unwrap_or(0) * 100
    }

    fn pin_mode(&mut self, pin: i32, mode: i32) {
        self.pin_modes.push((pin, mode));
    }

    fn digital_write(&mut self, pin: i32, value: i32) {
        self.pins.insert(pin, value);
    }

    fn sleep(&mut self, ms: u32) {
        self.slept += ms;
    }

    fn save_program(&mut self, image: &[u8]) -> bool {
        self.slot = Some(image.to_vec());
        true
    }

    fn load_program(&mut self) -> Option<Vec<u8>> {
        self.slot.clone()
    }

    fn save_named(&mut self, name: &str, image: &[u8]) -> bool {
        self.named.insert(name.to_ascii_uppercase(), image.to_vec());
        true
    }

    fn load_named(&mut self, name: &str) -> Option<Vec<u8>> {
        self.named.get(&name.to_ascii_uppercase()).cloned()
    }

    fn delete_named(&mut self, name: &str) -> bool {
        self.named.remove(&name.to_ascii_uppercase()).is_some()
    }

    fn list_programs(&mut self) {
        let mut names: Vec<&String> = self.named.keys().collect();
        names.sort();
        for name in names {
            self.out.push_str(name);
            self.out.push('\n');
        }
    }
}

pub fn runtime() -> Runtime<TestHost> {
    let mut r = Runtime::<TestHost>::default();
    r.seed(1);
    r
}

/// Enters one line and returns what it printed. Errors print the way
/// the terminal shows them.
pub fn exec(r: &mut Runtime<TestHost>, line: &str) -> String {
    r.host_mut().out.clear();
    if let Err(error) = r.enter(line) {
        r.host_mut().out.push_str(&format!("?{}\n", error));
    }
    let out = r.host().out.clone();
    assert!(r.regions().is_ordered(), "{:?}", r.regions());
    out
}

/// Enters every line, returning only the output of the last.
pub fn exec_all(r: &mut Runtime<TestHost>, lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out = exec(r, line);
    }
    out
}
