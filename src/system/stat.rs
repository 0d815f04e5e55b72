//! Parser for the per-process `stat` record.
//!
//! The record looks like `pid (comm) state ppid ... utime stime ...`. The
//! command name may itself contain spaces and parentheses, so the numeric
//! fields are located relative to the *last* closing parenthesis and read
//! through [`STAT_COLUMNS`], a table of `name -> offset -> setter`.

/// Fields after the closing parenthesis needed for a well-formed record.
/// `rss` at offset 21 is the last column read.
pub const MIN_FIELDS: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub name: String,
    pub state: char,
    pub ppid: u32,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub start_time: u64,
    pub vsize: u64,
    pub rss_pages: u64,
    /// Set when the record had no parenthesized name or too few fields.
    pub malformed: bool,
}

impl Default for StatRecord {
    fn default() -> Self {
        StatRecord {
            name: String::new(),
            state: '?',
            ppid: 0,
            utime: 0,
            stime: 0,
            cutime: 0,
            cstime: 0,
            start_time: 0,
            vsize: 0,
            rss_pages: 0,
            malformed: false,
        }
    }
}

pub struct StatColumn {
    pub name: &'static str,
    pub offset: usize,
    apply: fn(&mut StatRecord, &str),
}

/// Offsets count from the first field after the command name (`state` = 0).
pub const STAT_COLUMNS: &[StatColumn] = &[
    StatColumn { name: "state", offset: 0, apply: set_state },
    StatColumn { name: "ppid", offset: 1, apply: set_ppid },
    StatColumn { name: "utime", offset: 11, apply: set_utime },
    StatColumn { name: "stime", offset: 12, apply: set_stime },
    StatColumn { name: "cutime", offset: 13, apply: set_cutime },
    StatColumn { name: "cstime", offset: 14, apply: set_cstime },
    StatColumn { name: "starttime", offset: 19, apply: set_start_time },
    StatColumn { name: "vsize", offset: 20, apply: set_vsize },
    StatColumn { name: "rss", offset: 21, apply: set_rss },
];

fn parse_counter(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

fn set_state(r: &mut StatRecord, raw: &str) {
    r.state = raw.chars().next().unwrap_or('?');
}

fn set_ppid(r: &mut StatRecord, raw: &str) {
    r.ppid = raw.parse().unwrap_or(0);
}

fn set_utime(r: &mut StatRecord, raw: &str) {
    r.utime = parse_counter(raw);
}

fn set_stime(r: &mut StatRecord, raw: &str) {
    r.stime = parse_counter(raw);
}

fn set_cutime(r: &mut StatRecord, raw: &str) {
    r.cutime = parse_counter(raw);
}

fn set_cstime(r: &mut StatRecord, raw: &str) {
    r.cstime = parse_counter(raw);
}

fn set_start_time(r: &mut StatRecord, raw: &str) {
    r.start_time = parse_counter(raw);
}

fn set_vsize(r: &mut StatRecord, raw: &str) {
    r.vsize = parse_counter(raw);
}

fn set_rss(r: &mut StatRecord, raw: &str) {
    // The kernel prints rss as a signed long.
    r.rss_pages = raw.parse::<i64>().map(|v| v.max(0) as u64).unwrap_or(0);
}

impl StatRecord {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end();
        let (Some(open), Some(close)) = (line.find('('), line.rfind(')')) else {
            return StatRecord {
                malformed: true,
                ..StatRecord::default()
            };
        };
        if close < open {
            return StatRecord {
                malformed: true,
                ..StatRecord::default()
            };
        }

        let mut record = StatRecord {
            name: line[open + 1..close].to_string(),
            ..StatRecord::default()
        };

        let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            record.malformed = true;
            return record;
        }

        for column in STAT_COLUMNS {
            (column.apply)(&mut record, fields[column.offset]);
        }
        record
    }

    pub fn cpu_time_ticks(&self) -> u64 {
        self.utime
            .saturating_add(self.stime)
            .saturating_add(self.cutime)
            .saturating_add(self.cstime)
    }
}
