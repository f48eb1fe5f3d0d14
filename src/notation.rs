use std::fmt;

use winnow::ascii::{Caseless, digit1, float, space0};
use winnow::combinator::{alt, delimited, opt, separated_pair};
use winnow::prelude::*;
use winnow::token::one_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Fixed(u32),
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Unspecified,
    One,
    Many,
    MinMax { min: Bound, max: Bound },
    Other(String),
}

impl Cardinality {
    pub fn is_many(&self) -> bool {
        match self {
            Cardinality::Many => true,
            Cardinality::MinMax { max, .. } => *max == Bound::Unbounded,
            Cardinality::Unspecified | Cardinality::One | Cardinality::Other(_) => false,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Fixed(n) => write!(f, "{n}"),
            Bound::Unbounded => write!(f, "n"),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Unspecified => Ok(()),
            Cardinality::One => write!(f, "1"),
            Cardinality::Many => write!(f, "N"),
            Cardinality::MinMax { min, max } => write!(f, "({min},{max})"),
            Cardinality::Other(label) => write!(f, "{label}"),
        }
    }
}

pub fn parse_cardinality(label: &str) -> Cardinality {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Cardinality::Unspecified;
    }
    let mut input = trimmed;
    match cardinality_label(&mut input) {
        Ok(card) if input.is_empty() => card,
        _ => Cardinality::Other(trimmed.to_string()),
    }
}

pub fn parse_length(text: &str) -> Option<f64> {
    let mut input = text;
    match css_length(&mut input) {
        Ok(value) if input.is_empty() && value.is_finite() => Some(value),
        _ => None,
    }
}

fn cardinality_label(input: &mut &str) -> winnow::Result<Cardinality> {
    alt((
        min_max,
        one_of(['n', 'N', 'm', 'M']).value(Cardinality::Many),
        '1'.value(Cardinality::One),
    ))
    .parse_next(input)
}

fn min_max(input: &mut &str) -> winnow::Result<Cardinality> {
    let (min, max) = delimited(
        ('(', space0),
        separated_pair(bound, (space0, ',', space0), bound),
        (space0, ')'),
    )
    .parse_next(input)?;
    Ok(Cardinality::MinMax { min, max })
}

fn bound(input: &mut &str) -> winnow::Result<Bound> {
    alt((
        digit1
            .try_map(|digits: &str| digits.parse::<u32>())
            .map(Bound::Fixed),
        one_of(['n', 'N', 'm', 'M', '*']).value(Bound::Unbounded),
    ))
    .parse_next(input)
}

fn css_length(input: &mut &str) -> winnow::Result<f64> {
    space0.parse_next(input)?;
    let value: f64 = float.parse_next(input)?;
    opt(Caseless("px")).parse_next(input)?;
    space0.parse_next(input)?;
    Ok(value)
}
