//! SQL statement parsing and metadata
//!
//! A [`Statement`] is the client-side shape of one SQL text: its kind
//! (query, DML, DDL, PL/SQL) and the bind markers it contains. The marker
//! count is what [`crate::executor`] checks caller parameter lists against.
//! Column metadata arrives from the native session at prepare time.

use crate::constants::OracleType;

/// Statement kind determined by the leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    /// Unknown or unparsed statement
    #[default]
    Unknown,
    /// SELECT query
    Query,
    /// INSERT, UPDATE, DELETE, MERGE
    Dml,
    /// CREATE, ALTER, DROP, etc.
    Ddl,
    /// BEGIN, DECLARE, CALL block
    PlSql,
}

/// Metadata for a column in a result set
///
/// Produced once per prepared statement by the native session and shared
/// read-only by every decode of that statement.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared data type
    pub oracle_type: OracleType,
    /// Maximum byte width (fixed-width character padding target)
    pub width: u32,
    /// Precision for NUMBER (0 = undeclared)
    pub precision: u8,
    /// Scale for NUMBER
    pub scale: i16,
    /// Whether NULL values are allowed
    pub nullable: bool,
}

impl ColumnInfo {
    /// Create a column with minimal info
    pub fn new(name: impl Into<String>, oracle_type: OracleType) -> Self {
        Self {
            name: name.into(),
            oracle_type,
            width: 0,
            precision: 0,
            scale: 0,
            nullable: true,
        }
    }

    /// Set the declared byte width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set NUMBER precision and scale
    pub fn with_precision_scale(mut self, precision: u8, scale: i16) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }
}

/// A parsed SQL statement shape
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    kind: StatementKind,
    bind_names: Vec<String>,
}

impl Statement {
    /// Parse SQL text into its statement shape
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let kind = detect_kind(&sql);
        let bind_names = if kind == StatementKind::Ddl {
            // DDL takes no binds
            Vec::new()
        } else {
            scan_bind_names(&sql, kind)
        };
        Self {
            sql,
            kind,
            bind_names,
        }
    }

    /// The SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The statement kind
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Check if this statement produces a result set
    pub fn is_query(&self) -> bool {
        self.kind == StatementKind::Query
    }

    /// Bind marker names in order of appearance
    pub fn bind_names(&self) -> &[String] {
        &self.bind_names
    }

    /// Number of bind parameters one execution requires
    pub fn parameter_count(&self) -> usize {
        self.bind_names.len()
    }
}

fn detect_kind(sql: &str) -> StatementKind {
    let first_word = sql
        .trim_start()
        .split_whitespace()
        .next()
        .map(str::to_uppercase);
    match first_word.as_deref() {
        Some("SELECT") | Some("WITH") => StatementKind::Query,
        Some("INSERT") | Some("UPDATE") | Some("DELETE") | Some("MERGE") => StatementKind::Dml,
        Some("CREATE") | Some("ALTER") | Some("DROP") | Some("GRANT") | Some("REVOKE")
        | Some("ANALYZE") | Some("AUDIT") | Some("COMMENT") | Some("TRUNCATE") => {
            StatementKind::Ddl
        }
        Some("DECLARE") | Some("BEGIN") | Some("CALL") => StatementKind::PlSql,
        _ => StatementKind::Unknown,
    }
}

/// Scan bind markers, skipping string literals and comments
///
/// Markers are in order of appearance. PL/SQL blocks reference each name
/// once regardless of repetition; plain SQL counts every occurrence.
fn scan_bind_names(sql: &str, kind: StatementKind) -> Vec<String> {
    let chars: Vec<char> = sql.chars().collect();
    let len = chars.len();
    let mut names: Vec<String> = Vec::new();

    let mut i = 0;
    let mut in_string = false;
    let mut in_block_comment = false;
    let mut in_line_comment = false;

    while i < len {
        let ch = chars[i];

        if ch == '\'' && !in_block_comment && !in_line_comment {
            in_string = !in_string;
            i += 1;
            continue;
        }
        if in_string {
            i += 1;
            continue;
        }

        if ch == '-' && chars.get(i + 1) == Some(&'-') && !in_block_comment {
            in_line_comment = true;
            i += 2;
            continue;
        }
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if ch == '/' && chars.get(i + 1) == Some(&'*') {
            in_block_comment = true;
            i += 2;
            continue;
        }
        if in_block_comment {
            if ch == '*' && chars.get(i + 1) == Some(&'/') {
                in_block_comment = false;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        if ch == ':' && i + 1 < len {
            let (name, consumed) = extract_bind_name(&chars, i + 1);
            if !name.is_empty() {
                let duplicate = kind == StatementKind::PlSql && names.contains(&name);
                if !duplicate {
                    names.push(name);
                }
                i += 1 + consumed;
                continue;
            }
        }

        i += 1;
    }

    names
}

/// Extract a bind name starting after the colon
///
/// Returns the name and how many characters it consumed. Supports `:n`
/// positional markers, `:name`, and `:"Quoted"` forms.
fn extract_bind_name(chars: &[char], start: usize) -> (String, usize) {
    let len = chars.len();
    let mut i = start;

    // Whitespace between the colon and the name is legal
    while i < len && chars[i].is_whitespace() {
        i += 1;
    }
    if i >= len {
        return (String::new(), 0);
    }

    let first = chars[i];

    if first == '"' {
        i += 1;
        let name_start = i;
        while i < len && chars[i] != '"' {
            i += 1;
        }
        if i > name_start && i < len {
            let name: String = chars[name_start..i].iter().collect();
            return (name, i + 1 - start);
        }
        return (String::new(), 0);
    }

    if first.is_ascii_digit() {
        let name_start = i;
        while i < len && chars[i].is_ascii_digit() {
            i += 1;
        }
        let name: String = chars[name_start..i].iter().collect();
        return (name, i - start);
    }

    if !first.is_alphabetic() {
        return (String::new(), 0);
    }

    let name_start = i;
    while i < len {
        let ch = chars[i];
        if ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '#' {
            i += 1;
        } else {
            break;
        }
    }
    let name: String = chars[name_start..i].iter().collect::<String>().to_uppercase();
    (name, i - start)
}
