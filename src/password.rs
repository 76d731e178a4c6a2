//! password generation for the `pass?` endpoint

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};

use crate::query::QueryParameters;

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 24;
pub const DEFAULT_LENGTH: usize = MIN_LENGTH;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SPECIAL: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?/~`";
const DIGITS: &str = "0123456789";

/// optional character classes, lowercase is always in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Uppercase,
    Special,
    Digits,
}

impl CharClass {
    pub fn all() -> &'static [CharClass] {
        &[CharClass::Uppercase, CharClass::Special, CharClass::Digits]
    }

    pub fn charset(&self) -> &'static str {
        match self {
            CharClass::Uppercase => UPPERCASE,
            CharClass::Special => SPECIAL,
            CharClass::Digits => DIGITS,
        }
    }

    /// the `OPT` flag digit that excludes this class
    pub fn flag(&self) -> char {
        match self {
            CharClass::Uppercase => '1',
            CharClass::Special => '2',
            CharClass::Digits => '3',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    length: usize,
    excluded: Vec<CharClass>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            excluded: Vec::new(),
        }
    }
}

impl PasswordPolicy {
    /// build a policy, `None` if the length is outside the allowed range
    pub fn new(length: usize, excluded: Vec<CharClass>) -> Option<Self> {
        if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            Some(Self { length, excluded })
        } else {
            None
        }
    }

    /// build a policy from the `l` and `OPT` query parameters
    ///
    /// a bad length never rejects the request: the default length is used
    /// and a warning is returned alongside the policy.
    pub fn from_query(params: &QueryParameters) -> (Self, Option<String>) {
        let excluded = parse_exclusions(params.get("OPT").unwrap_or(""));

        let (length, warning) = match params.get("l") {
            None | Some("") => (DEFAULT_LENGTH, None),
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (MIN_LENGTH..=MAX_LENGTH).contains(&n) => (n, None),
                Ok(_) => (
                    DEFAULT_LENGTH,
                    Some(format!(
                        "WARNING: Invalid length parameter. It must be an integer between {} and {}. Using default length {}.",
                        MIN_LENGTH, MAX_LENGTH, DEFAULT_LENGTH
                    )),
                ),
                Err(_) => (
                    DEFAULT_LENGTH,
                    Some(format!(
                        "WARNING: Invalid length parameter '{}': not an integer. Using default length {}.",
                        raw, DEFAULT_LENGTH
                    )),
                ),
            },
        };

        (Self { length, excluded }, warning)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn excludes(&self, class: CharClass) -> bool {
        self.excluded.contains(&class)
    }

    /// characters the password is drawn from, never empty
    pub fn pool(&self) -> Vec<char> {
        let mut pool: Vec<char> = LOWERCASE.chars().collect();
        for class in CharClass::all() {
            if !self.excludes(*class) {
                pool.extend(class.charset().chars());
            }
        }
        pool
    }
}

/// `OPT` is a bag of digits, any other character is ignored
fn parse_exclusions(opt: &str) -> Vec<CharClass> {
    CharClass::all()
        .iter()
        .copied()
        .filter(|class| opt.contains(class.flag()))
        .collect()
}

/// generate a password using the operating system's CSPRNG
pub fn generate(policy: &PasswordPolicy) -> String {
    generate_with(policy, &mut OsRng)
}

pub fn generate_with<R: Rng + CryptoRng>(policy: &PasswordPolicy, rng: &mut R) -> String {
    let pool = policy.pool();
    (0..policy.length())
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect()
}
