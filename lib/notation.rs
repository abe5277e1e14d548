//! Text notation for cascades and photon energies.
//!
//! A cascade is written as a whitespace-separated list of states, e.g.
//! `"0+ 1- [0.1] 2 0"` or `"3/2- [-0.8] 5/2+ [0.8] 3/2"`. Each state is an
//! integer spin or a half-integer `n/2`, optionally followed by its parity.
//! A number in square brackets between two states is the multipole mixing
//! ratio of the transition connecting them (zero if absent).
//!
//! Each transition is assigned the lowest multipolarity allowed by the spin
//! difference (but at least a dipole) and the next higher one as its
//! secondary multipolarity. Electromagnetic characters are assigned wherever
//! both parities are known.
//!
//! Energies are written as a list of numbers followed by a unit, e.g.
//! `"1.0 2.5 MeV"`, and are converted to MeV.

use itertools::Itertools;
use regex::Regex;
use thiserror::Error;
use crate::cascade::{ Cascade, CascadeError, EMCharacter, Parity, State, Transition };

#[derive(Debug, Error)]
pub enum NotationError {
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid state or mixing ratio '{0}'")]
    InvalidToken(String),

    #[error("a cascade needs at least three states, got {0}")]
    TooFewStates(usize),

    #[error("cascade '{0}' mixes integer and half-integer spins")]
    MixedSpins(String),

    #[error("mixing ratio '{0}' must stand between two states")]
    MisplacedMixingRatio(String),

    #[error("energy list '{0}' must end with a unit")]
    MissingUnit(String),

    #[error("unknown energy unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid energy '{0}'")]
    InvalidEnergy(String),

    #[error("{0}")]
    Cascade(#[from] CascadeError),
}
pub type NotationResult<T> = Result<T, NotationError>;

enum Token {
    State(State),
    Delta(f64),
}

fn tokenize(notation: &str) -> NotationResult<Vec<Token>> {
    let state_pat = Regex::new(r"^(\d+)(/2)?([+-])?$")?;
    let delta_pat = Regex::new(r"^\[(.+)\]$")?;
    notation.split_whitespace()
        .map(|tok| -> NotationResult<Token> {
            let invalid = || NotationError::InvalidToken(tok.to_string());
            if let Some(cap) = state_pat.captures(tok) {
                let n: u32 = cap[1].parse().map_err(|_| invalid())?;
                let two_J = if cap.get(2).is_some() { n } else { 2 * n };
                let parity
                    = match cap.get(3).map(|m| m.as_str()) {
                        Some("+") => Parity::Positive,
                        Some("-") => Parity::Negative,
                        _ => Parity::Unknown,
                    };
                Ok(Token::State(State::new(two_J, parity)))
            } else if let Some(cap) = delta_pat.captures(tok) {
                let delta: f64 = cap[1].trim().parse().map_err(|_| invalid())?;
                Ok(Token::Delta(delta))
            } else {
                Err(invalid())
            }
        })
        .collect()
}

/// Build the transition connecting `s0` and `s1` from their quantum numbers.
///
/// Fails if one spin is an integer and the other a half-integer.
pub fn infer_transition(s0: &State, s1: &State, delta: f64)
    -> NotationResult<Transition>
{
    let two_L = s0.two_J.abs_diff(s1.two_J).max(2);
    let two_Lp = two_L + 2;
    let transition = Transition::new(
        EMCharacter::from_parities(s0.parity, s1.parity, two_L),
        two_L,
        EMCharacter::from_parities(s0.parity, s1.parity, two_Lp),
        two_Lp,
        delta,
    )?;
    Ok(transition)
}

/// Parse a cascade.
pub fn parse_cascade(notation: &str) -> NotationResult<Cascade> {
    let tokens = tokenize(notation)?;
    let mut states: Vec<State> = Vec::new();
    let mut deltas: Vec<f64> = Vec::new();
    let mut pending_delta: Option<f64> = None;
    for tok in tokens.into_iter() {
        match tok {
            Token::State(s) => {
                if !states.is_empty() {
                    deltas.push(pending_delta.take().unwrap_or(0.0));
                }
                states.push(s);
            },
            Token::Delta(d) => {
                if states.is_empty() || pending_delta.is_some() {
                    return Err(NotationError::MisplacedMixingRatio(d.to_string()));
                }
                pending_delta = Some(d);
            },
        }
    }
    if let Some(d) = pending_delta {
        return Err(NotationError::MisplacedMixingRatio(d.to_string()));
    }
    if states.len() < 3 {
        return Err(NotationError::TooFewStates(states.len()));
    }
    if states.iter().map(|s| s.two_J % 2).dedup().count() > 1 {
        return Err(NotationError::MixedSpins(notation.to_string()));
    }
    let steps: Vec<(Transition, State)>
        = states.windows(2).zip(deltas)
        .map(|(pair, delta)| -> NotationResult<(Transition, State)> {
            Ok((infer_transition(&pair[0], &pair[1], delta)?, pair[1]))
        })
        .collect::<NotationResult<_>>()?;
    Ok(Cascade::new(states[0], steps)?)
}

/// Conversion factor from `unit` to MeV.
pub fn unit_to_mev(unit: &str) -> NotationResult<f64> {
    match unit {
        "eV" => Ok(1e-6),
        "keV" => Ok(1e-3),
        "MeV" => Ok(1.0),
        "GeV" => Ok(1e3),
        _ => Err(NotationError::UnknownUnit(unit.to_string())),
    }
}

/// Parse a list of energies followed by a unit, returning energies in MeV.
pub fn parse_energies(notation: &str) -> NotationResult<Vec<f64>> {
    let mut tokens: Vec<&str> = notation.split_whitespace().collect();
    let unit
        = tokens.pop()
        .ok_or_else(|| NotationError::MissingUnit(notation.to_string()))?;
    if unit.parse::<f64>().is_ok() {
        return Err(NotationError::MissingUnit(notation.to_string()));
    }
    let factor = unit_to_mev(unit)?;
    tokens.into_iter()
        .map(|tok| {
            tok.parse::<f64>()
                .map(|e| e * factor)
                .map_err(|_| NotationError::InvalidEnergy(tok.to_string()))
        })
        .collect()
}
