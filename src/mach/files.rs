use crate::error;
use crate::lang::ast::FileMode;
use crate::lang::Error;
use std::collections::{HashMap, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::Write;

type Result<T> = std::result::Result<T, Error>;

enum Handle {
    Reader(VecDeque<String>),
    Writer(File),
}

/// Numbered file handles opened with `OPEN ... AS #n`. Input files are
/// read completely when opened.
#[derive(Default)]
pub struct Files {
    open: HashMap<i64, Handle>,
}

impl std::fmt::Debug for Files {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut numbers: Vec<_> = self.open.keys().collect();
        numbers.sort();
        write!(f, "Files{:?}", numbers)
    }
}

fn io_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::NotFound => error!(FileNotFound; e.to_string()),
        _ => error!(DiskIoError; e.to_string()),
    }
}

impl Files {
    pub fn new() -> Files {
        Files::default()
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }

    pub fn open(&mut self, number: i64, path: &str, mode: FileMode) -> Result<()> {
        if number < 1 || number > 255 {
            return Err(error!(BadFileNumber));
        }
        let handle = match mode {
            FileMode::Input => {
                let text = std::fs::read_to_string(path).map_err(io_error)?;
                Handle::Reader(text.lines().map(String::from).collect())
            }
            FileMode::Output => Handle::Writer(File::create(path).map_err(io_error)?),
            FileMode::Append => Handle::Writer(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(io_error)?,
            ),
        };
        self.open.insert(number, handle);
        Ok(())
    }

    pub fn close(&mut self, number: i64) -> Result<()> {
        match self.open.remove(&number) {
            Some(_) => Ok(()),
            None => Err(error!(BadFileNumber)),
        }
    }

    /// `None` once the file is exhausted.
    pub fn read_line(&mut self, number: i64) -> Result<Option<String>> {
        match self.open.get_mut(&number) {
            Some(Handle::Reader(lines)) => Ok(lines.pop_front()),
            Some(Handle::Writer(_)) => Err(error!(BadFileMode)),
            None => Err(error!(BadFileNumber)),
        }
    }

    /// Everything not yet read, joined with newlines.
    pub fn read_rest(&mut self, number: i64) -> Result<String> {
        match self.open.get_mut(&number) {
            Some(Handle::Reader(lines)) => {
                Ok(lines.drain(..).collect::<Vec<_>>().join("\n"))
            }
            Some(Handle::Writer(_)) => Err(error!(BadFileMode)),
            None => Err(error!(BadFileNumber)),
        }
    }

    pub fn write_line(&mut self, number: i64, text: &str) -> Result<()> {
        match self.open.get_mut(&number) {
            Some(Handle::Writer(file)) => writeln!(file, "{}", text).map_err(io_error),
            Some(Handle::Reader(_)) => Err(error!(BadFileMode)),
            None => Err(error!(BadFileNumber)),
        }
    }
}

pub fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(io_error)
}

pub fn write_file(path: &str, text: &str, append: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(io_error)?;
    file.write_all(text.as_bytes()).map_err(io_error)
}
