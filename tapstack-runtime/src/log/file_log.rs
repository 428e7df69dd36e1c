use crate::log::{Direction, Header, HeaderKind, HeaderLog, TextLog};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub const ETHERNET_LOG_FILE: &str = "ethernet_log.txt";
pub const ARP_LOG_FILE: &str = "arp_log.txt";
pub const IP_LOG_FILE: &str = "ip_log.txt";

/// One append-only text file per header kind, all in the same directory.
pub struct FileHeaderLog {
    ethernet: TextLog<File>,
    arp: TextLog<File>,
    ip: TextLog<File>,
}

impl FileHeaderLog {
    /// Opens (creating if needed) the three log files in `dir`. Existing records are kept.
    pub fn open<P: AsRef<Path>>(dir: P) -> io::Result<FileHeaderLog> {
        let dir = dir.as_ref();
        Ok(FileHeaderLog {
            ethernet: TextLog::new(open_append(&dir.join(ETHERNET_LOG_FILE))?),
            arp: TextLog::new(open_append(&dir.join(ARP_LOG_FILE))?),
            ip: TextLog::new(open_append(&dir.join(IP_LOG_FILE))?),
        })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.ethernet.flush()?;
        self.arp.flush()?;
        self.ip.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl HeaderLog for FileHeaderLog {
    fn log(&mut self, header: Header<'_>, direction: Direction) {
        match header.kind() {
            HeaderKind::Ethernet => self.ethernet.log(header, direction),
            HeaderKind::Arp => self.arp.log(header, direction),
            HeaderKind::Ip => self.ip.log(header, direction),
        }
    }
}
