extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use ansi_term::Style;
use basic::error;
use basic::lang::Error;
use basic::mach::{Host, Runtime};
use chrono::{DateTime, Local};
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Name of the default program slot. Longer than any BASIC name so the
/// two never collide.
const DEFAULT_SLOT: &str = "__default";
const MAX_NAME_LEN: usize = 8;

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
    }
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> io::Result<()> {
    let interface = Arc::new(Interface::new("BASIC")?);
    interface.set_report_signal(Signal::Interrupt, true);
    let host = TermHost::new(interface.clone(), interrupted.clone(), FileStore::from_env());
    let mut runtime = Runtime::new(host);
    interface.write_fmt(format_args!("{} BYTES FREE\n", runtime.free_memory()))?;

    if let Some(arg) = std::env::args().nth(1) {
        let loaded = read_source(&arg).and_then(|text| enter_listing(&mut runtime, &text));
        if let Err(msg) = loaded {
            interface.write_fmt(format_args!("{}\n", Style::new().bold().paint(msg)))?;
        }
    }
    if let Err(error) = runtime.boot() {
        report(&interface, &error)?;
    }

    let mut print_ready = true;
    loop {
        runtime.host_mut().flush();
        if print_ready {
            print_ready = false;
            interface.write_fmt(format_args!("READY.\n"))?;
        }
        let input = match interface.read_line()? {
            ReadResult::Input(input) => input,
            ReadResult::Signal(Signal::Interrupt) => continue,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        interrupted.store(false, Ordering::SeqCst);
        let numbered = input.trim_start().starts_with(|c: char| c.is_ascii_digit());
        match runtime.enter(&input) {
            Ok(()) => print_ready = !numbered,
            Err(error) => {
                runtime.host_mut().flush();
                report(&interface, &error)?;
                print_ready = true;
            }
        }
        if !input.trim().is_empty() {
            interface.add_history_unique(input);
        }
    }
    Ok(())
}

fn report(interface: &Interface<DefaultTerminal>, error: &Error) -> io::Result<()> {
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(format!("?{}", error))
    ))
}

/// Program text from a file or an http(s) URL.
fn read_source(arg: &str) -> Result<String, String> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        reqwest::blocking::get(arg)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|error| error.to_string())
    } else {
        fs::read_to_string(arg).map_err(|error| error.to_string())
    }
}

/// Enters a plain text listing one line at a time. Every line must be
/// numbered.
fn enter_listing<H: Host>(runtime: &mut Runtime<H>, text: &str) -> Result<(), String> {
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let result = if line.starts_with(|c: char| c.is_ascii_digit()) {
            runtime.enter(line)
        } else {
            Err(error!(BadCommand; "DIRECT STATEMENT IN FILE"))
        };
        if let Err(error) = result {
            return Err(format!("?{} IN FILE LINE {}", error, index + 1));
        }
    }
    Ok(())
}

/// ## Terminal host
///
/// Output is buffered and written through linefeed on each new line.
/// Screen control and key polling go straight to the terminal.

struct TermHost {
    interface: Arc<Interface<DefaultTerminal>>,
    interrupted: Arc<AtomicBool>,
    store: FileStore,
    out: String,
    pins: HashMap<i32, i32>,
}

impl TermHost {
    fn new(
        interface: Arc<Interface<DefaultTerminal>>,
        interrupted: Arc<AtomicBool>,
        store: FileStore,
    ) -> TermHost {
        TermHost {
            interface,
            interrupted,
            store,
            out: String::new(),
            pins: HashMap::new(),
        }
    }

    fn write_line(&mut self, s: &str) {
        self.flush();
        let _ = self.interface.write_fmt(format_args!("{}\n", s));
    }
}

impl Host for TermHost {
    fn output_char(&mut self, ch: u8) {
        self.out.push(ch as char);
    }

    fn new_line(&mut self) {
        self.out.push('\n');
        self.flush();
    }

    fn flush(&mut self) {
        if !self.out.is_empty() {
            let _ = self.interface.write_fmt(format_args!("{}", self.out));
            self.out.clear();
        }
    }

    fn cls(&mut self) {
        self.flush();
        if let Ok(term) = mortal::Terminal::new() {
            let _ = term.clear_screen();
        }
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.flush();
        let _ = self.interface.write_fmt(format_args!(
            "\x1b[{};{}H",
            y.max(0) + 1,
            x.max(0) + 1
        ));
    }

    fn read_line(&mut self) -> String {
        self.flush();
        let _ = self.interface.set_prompt("? ");
        let line = match self.interface.read_line() {
            Ok(ReadResult::Input(line)) => line,
            Ok(ReadResult::Signal(Signal::Interrupt)) => {
                self.interrupted.store(true, Ordering::SeqCst);
                String::new()
            }
            _ => String::new(),
        };
        let _ = self.interface.set_prompt("");
        line
    }

    fn get_key(&mut self) -> Option<u8> {
        let term = mortal::Terminal::new().ok()?;
        let state = term.prepare(mortal::PrepareConfig::default()).ok()?;
        let event = term.read_event(Some(Duration::from_millis(0)));
        let _ = term.restore(state);
        match event {
            Ok(Some(mortal::Event::Key(mortal::Key::Char(ch)))) if ch.is_ascii() => Some(ch as u8),
            Ok(Some(mortal::Event::Key(mortal::Key::Enter))) => Some(b'\r'),
            _ => None,
        }
    }

    fn interrupted(&mut self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }

    fn digital_read(&mut self, pin: i32) -> i32 {
        self.pins.get(&pin).copied().unwrap_or(0)
    }

    fn digital_write(&mut self, pin: i32, value: i32) {
        self.pins.insert(pin, value);
    }

    fn sleep(&mut self, ms: u32) {
        self.flush();
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn save_program(&mut self, image: &[u8]) -> bool {
        self.store.save(DEFAULT_SLOT, image).is_ok()
    }

    fn load_program(&mut self) -> Option<Vec<u8>> {
        self.store.load(DEFAULT_SLOT)
    }

    fn save_named(&mut self, name: &str, image: &[u8]) -> bool {
        self.store.save(name, image).is_ok()
    }

    fn load_named(&mut self, name: &str) -> Option<Vec<u8>> {
        self.store.load(name)
    }

    fn delete_named(&mut self, name: &str) -> bool {
        self.store.delete(name)
    }

    fn list_programs(&mut self) {
        match self.store.list() {
            Ok(entries) => {
                for (name, modified) in entries {
                    let line = format!("{:<8}  {}", name, modified.format("%Y-%m-%d %H:%M"));
                    self.write_line(&line);
                }
            }
            Err(error) => self.write_line(&error.to_string()),
        }
    }
}

/// ## Program files
///
/// Each program is `<name>.bas` in `BASIC_HOME`, or the current
/// directory, holding the token image followed by its CRC-32.

struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    fn from_env() -> FileStore {
        let dir = std::env::var_os("BASIC_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        FileStore { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.bas", name.to_ascii_lowercase()))
    }

    fn save(&self, name: &str, image: &[u8]) -> io::Result<()> {
        let mut bytes = image.to_vec();
        bytes.extend_from_slice(&crc::crc32::checksum_ieee(image).to_le_bytes());
        fs::write(self.path(name), bytes)
    }

    /// `None` when missing or when the checksum does not match.
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        let mut bytes = fs::read(self.path(name)).ok()?;
        if bytes.len() < 4 {
            return None;
        }
        let image_len = bytes.len() - 4;
        let mut sum = [0; 4];
        sum.copy_from_slice(&bytes[image_len..]);
        bytes.truncate(image_len);
        if crc::crc32::checksum_ieee(&bytes) != u32::from_le_bytes(sum) {
            return None;
        }
        Some(bytes)
    }

    fn delete(&self, name: &str) -> bool {
        fs::remove_file(self.path(name)).is_ok()
    }

    fn list(&self) -> io::Result<Vec<(String, DateTime<Local>)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "bas") {
                continue;
            }
            let name = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(name) if name.len() <= MAX_NAME_LEN => name.to_ascii_uppercase(),
                _ => continue,
            };
            let modified = fs::metadata(&path)?.modified()?;
            entries.push((name, DateTime::<Local>::from(modified)));
        }
        entries.sort();
        Ok(entries)
    }
}
