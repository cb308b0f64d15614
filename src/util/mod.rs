#[macro_export]
macro_rules! println_verbose {
    ($verbose:expr, $($x:tt)*) => {{
        if $verbose {
            eprint!("[verbose] ");
            eprintln!($($x)*);
        }
    }}
}

/// Lexical class of a single character, used to find identifier boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Alpha,
    Numeric,
    Symbolic,
    /// No character seen yet
    Unknown,
}

impl CharClass {
    pub fn of(c: char) -> CharClass {
        if is_alphabetic(c) {
            CharClass::Alpha
        } else if is_numeric(c) {
            CharClass::Numeric
        } else {
            CharClass::Symbolic
        }
    }
}

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    ('a'..='z').contains(&c) || ('A'..='Z').contains(&c) || c == '_'
}

// '.' and '-' belong to number literals
#[inline]
pub fn is_numeric(c: char) -> bool {
    ('0'..='9').contains(&c) || c == '.' || c == '-'
}
