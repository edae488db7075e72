//! Password generation with guaranteed class coverage.
//!
//! The alphabet is the union of the enabled character classes minus any
//! excluded glyphs. One character is drawn from each enabled class first,
//! the rest uniformly from the whole alphabet, then the result is shuffled
//! so the seeded characters do not sit at fixed positions.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, GaugeBand, Present, Report};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:'\",.<>/?`~\\";

/// Glyphs easily confused with one another.
pub const SIMILAR: &str = "iIlL1oO0";
/// Symbols that are awkward to type or quote.
pub const AMBIGUOUS: &str = "{}[]()/\\'\"`~,;:.<>";

pub const MAX_LENGTH: usize = 256;
pub const MAX_BATCH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strength {
    VeryWeak,
    Weak,
    Reasonable,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_entropy(bits: f64) -> Self {
        if bits < 28.0 {
            Self::VeryWeak
        } else if bits < 36.0 {
            Self::Weak
        } else if bits < 60.0 {
            Self::Reasonable
        } else if bits < 128.0 {
            Self::Strong
        } else {
            Self::VeryStrong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryWeak => "Very weak",
            Self::Weak => "Weak",
            Self::Reasonable => "Reasonable",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPassword {
    pub password: String,
    /// `length · log2(alphabet size)`.
    pub entropy_bits: f64,
    pub strength: Strength,
}

impl PasswordOptions {
    /// Enabled classes with exclusions applied.
    fn classes(&self) -> Vec<Vec<char>> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, class)| {
            class
                .chars()
                .filter(|c| !(self.exclude_similar && SIMILAR.contains(*c)))
                .filter(|c| !(self.exclude_ambiguous && AMBIGUOUS.contains(*c)))
                .collect()
        })
        .collect()
    }

    fn validate(&self) -> CalcResult<Vec<Vec<char>>> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(ValidationError::invalid(
                "character_classes",
                "select at least one character type",
            ));
        }
        if self.length < classes.len() {
            return Err(ValidationError::invalid(
                "length",
                format!("must be at least {} to include every selected type", classes.len()),
            ));
        }
        if self.length > MAX_LENGTH {
            return Err(ValidationError::invalid(
                "length",
                format!("must be at most {MAX_LENGTH}"),
            ));
        }
        Ok(classes)
    }

    /// Size of the combined alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.classes().iter().map(Vec::len).sum()
    }

    pub fn generate(&self) -> CalcResult<GeneratedPassword> {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> CalcResult<GeneratedPassword> {
        let classes = self.validate()?;
        let alphabet: Vec<char> = classes.iter().flatten().copied().collect();

        let mut chars: Vec<char> = Vec::with_capacity(self.length);
        for class in &classes {
            chars.push(class[rng.gen_range(0..class.len())]);
        }
        while chars.len() < self.length {
            chars.push(alphabet[rng.gen_range(0..alphabet.len())]);
        }
        chars.shuffle(rng);

        let entropy_bits = self.length as f64 * (alphabet.len() as f64).log2();
        Ok(GeneratedPassword {
            password: chars.into_iter().collect(),
            entropy_bits,
            strength: Strength::from_entropy(entropy_bits),
        })
    }

    pub fn generate_many(
        &self,
        count: usize,
    ) -> CalcResult<Vec<GeneratedPassword>> {
        self.generate_many_with(count, &mut rand::thread_rng())
    }

    pub fn generate_many_with<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> CalcResult<Vec<GeneratedPassword>> {
        if count == 0 || count > MAX_BATCH {
            return Err(ValidationError::invalid(
                "count",
                format!("must be between 1 and {MAX_BATCH}"),
            ));
        }
        (0..count).map(|_| self.generate_with(rng)).collect()
    }
}

impl Present for GeneratedPassword {
    fn report(&self) -> Report {
        Report::new("Password")
            .line("Password", self.password.clone())
            .line("Length", self.password.chars().count().to_string())
            .line("Entropy", format!("{} bits", format_number(self.entropy_bits, 1)))
            .line("Strength", self.strength.label())
            .with_chart(ChartSpec::Gauge {
                title: "Entropy (bits)".to_string(),
                value: self.entropy_bits.min(160.0),
                min: 0.0,
                max: 160.0,
                bands: vec![
                    GaugeBand::new("Very weak", 0.0, 28.0),
                    GaugeBand::new("Weak", 28.0, 36.0),
                    GaugeBand::new("Reasonable", 36.0, 60.0),
                    GaugeBand::new("Strong", 60.0, 128.0),
                    GaugeBand::new("Very strong", 128.0, 160.0),
                ],
            })
    }
}
