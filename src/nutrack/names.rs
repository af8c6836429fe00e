//! Name validation and formatting for users and foods.
//!
//! Names are stored in their *in-file* form: lower-case ASCII letters with `_`
//! standing in for spaces. The same grammar applies to usernames and food names so both
//! kinds follow one set of casing and character rules.
//!
//! Valid in-file names:
//! - Between 1 and [`MAX_NAME_LEN`] characters
//! - Lower-case ASCII letters and underscores only
//! - Cannot start or end with an underscore
//! - Cannot have consecutive underscores (`__`)

pub const MAX_NAME_LEN: usize = 30;

const SEPARATOR: char = '_';

/// Validates an in-file name.
///
/// # Examples
/// ```
/// use nutrack::names::validate_name;
///
/// assert!(validate_name("bob").is_ok());
/// assert!(validate_name("green_apple").is_ok());
/// assert!(validate_name("mary_ann").is_ok());
///
/// assert!(validate_name("Mary_Ann").is_err());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("_bob").is_err());
/// assert!(validate_name("bob_").is_err());
/// assert!(validate_name("a__b").is_err());
/// assert!(validate_name("r2d2").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(name.len()));
    }
    if name.starts_with(SEPARATOR) || name.ends_with(SEPARATOR) {
        return Err(NameError::SeparatorAtEdge);
    }

    let mut prev_was_separator = false;
    for ch in name.chars() {
        if ch == SEPARATOR {
            if prev_was_separator {
                return Err(NameError::ConsecutiveSeparators);
            }
            prev_was_separator = true;
        } else if ch.is_ascii_lowercase() {
            prev_was_separator = false;
        } else {
            return Err(NameError::InvalidCharacter(ch));
        }
    }

    Ok(())
}

/// Converts a human-typed name into its in-file form: lower case, spaces
/// replaced with underscores. The result still has to pass [`validate_name`].
pub fn to_in_file_name(display: &str) -> String {
    display
        .chars()
        .map(|c| if c == ' ' { SEPARATOR } else { c.to_ascii_lowercase() })
        .collect()
}

/// Converts an in-file name into a display name: underscores become spaces and
/// every word starts with an upper-case letter.
pub fn to_display_name(in_file: &str) -> String {
    in_file
        .split(SEPARATOR)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Error type for name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty
    Empty,
    /// Name exceeds [`MAX_NAME_LEN`]; carries the actual length
    TooLong(usize),
    /// Name starts or ends with an underscore
    SeparatorAtEdge,
    /// Name contains `__`
    ConsecutiveSeparators,
    /// Name contains something other than a lower-case letter or underscore
    InvalidCharacter(char),
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameError::Empty => write!(f, "name cannot be empty"),
            NameError::TooLong(len) => write!(
                f,
                "name is {} characters long (at most {} allowed)",
                len, MAX_NAME_LEN
            ),
            NameError::SeparatorAtEdge => {
                write!(f, "name cannot start or end with a space")
            }
            NameError::ConsecutiveSeparators => {
                write!(f, "name cannot contain consecutive spaces")
            }
            NameError::InvalidCharacter(ch) => {
                write!(
                    f,
                    "name contains invalid character '{}' (only letters and single spaces allowed)",
                    ch
                )
            }
        }
    }
}

impl std::error::Error for NameError {}
