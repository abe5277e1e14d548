//! Nuclear states, electromagnetic transitions between them, and validated
//! decay cascades.
//!
//! Spins and multipolarities are stored in halves (see [`crate::spin`]).

use std::fmt;
use itertools::Itertools;
use thiserror::Error;
use crate::spin::{ fmt_spin, triangle };

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("the two multipolarities of a transition may not be equal, even if the coupling allows only one (2L = 2L' = {0})")]
    EqualMultipolarities(u32),

    #[error("multipolarities must be whole numbers of at least 1, got 2L = {0}")]
    InvalidMultipolarity(u32),

    #[error("a cascade needs at least two transitions, got {0}")]
    TooFewSteps(usize),

    #[error("triangle inequality violated by both multipolarities of transition '{0}'")]
    Triangle(String),

    #[error("electromagnetic character given for only one multipolarity of transition '{0}'")]
    MissingEMCharacter(String),

    #[error("electromagnetic character given, but a parity is unknown in transition '{0}'")]
    UnknownParity(String),

    #[error("electromagnetic character inconsistent with the parity change in transition '{0}'")]
    InconsistentEMCharacter(String),
}
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Parity of a nuclear state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    Negative,
    Positive,
    Unknown,
}

impl Parity {
    /// Return `±1`, or `None` if the parity is unknown.
    pub fn sign(self) -> Option<i32> {
        match self {
            Self::Negative => Some(-1),
            Self::Positive => Some(1),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool { self != Self::Unknown }
}

/// Electromagnetic character of a multipole.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EMCharacter {
    Electric,
    Magnetic,
    Unknown,
}

impl EMCharacter {
    pub fn is_known(self) -> bool { self != Self::Unknown }

    /// Sign attached to polarization terms: `-1` for magnetic radiation, `+1`
    /// otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Self::Magnetic => -1.0,
            _ => 1.0,
        }
    }

    /// The character required of a multipole of order `two_L / 2` connecting
    /// states with parities `p0` and `p1`, if both are known.
    pub fn from_parities(p0: Parity, p1: Parity, two_L: u32) -> Self {
        match (p0.sign(), p1.sign()) {
            (Some(s0), Some(s1)) => {
                let l_sign = if (two_L / 2) % 2 == 0 { 1 } else { -1 };
                if s0 * s1 == l_sign { Self::Electric } else { Self::Magnetic }
            },
            _ => Self::Unknown,
        }
    }

    fn letter(self) -> &'static str {
        match self {
            Self::Electric => "E",
            Self::Magnetic => "M",
            Self::Unknown => "",
        }
    }
}

/// A nuclear energy level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    pub two_J: u32,
    pub parity: Parity,
}

impl State {
    pub fn new(two_J: u32, parity: Parity) -> Self { Self { two_J, parity } }

    /// A state of unknown parity.
    pub fn spin(two_J: u32) -> Self { Self::new(two_J, Parity::Unknown) }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parity {
            Parity::Positive => write!(f, "{}^+", fmt_spin(self.two_J)),
            Parity::Negative => write!(f, "{}^-", fmt_spin(self.two_J)),
            Parity::Unknown => write!(f, "{}", fmt_spin(self.two_J)),
        }
    }
}

/// An electromagnetic transition with a primary multipolarity `two_L / 2`
/// and a secondary one `two_Lp / 2`, admixed with the multipole mixing ratio
/// `delta`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub em_char: EMCharacter,
    pub two_L: u32,
    pub em_charp: EMCharacter,
    pub two_Lp: u32,
    pub delta: f64,
}

impl Transition {
    /// Create a new transition.
    ///
    /// The two multipolarities must differ, even if only one of them is
    /// allowed by the coupling, and both must be whole numbers `>= 1`.
    pub fn new(
        em_char: EMCharacter,
        two_L: u32,
        em_charp: EMCharacter,
        two_Lp: u32,
        delta: f64,
    ) -> CascadeResult<Self>
    {
        let transition = Self { em_char, two_L, em_charp, two_Lp, delta };
        transition.check_multipolarities()?;
        Ok(transition)
    }

    fn check_multipolarities(&self) -> CascadeResult<()> {
        for two_L in [self.two_L, self.two_Lp] {
            if two_L == 0 || two_L % 2 != 0 {
                return Err(CascadeError::InvalidMultipolarity(two_L));
            }
        }
        if self.two_L == self.two_Lp {
            return Err(CascadeError::EqualMultipolarities(self.two_L));
        }
        Ok(())
    }

    /// Create a new transition of unknown electromagnetic character.
    pub fn unpolarized(two_L: u32, two_Lp: u32, delta: f64)
        -> CascadeResult<Self>
    {
        Self::new(EMCharacter::Unknown, two_L, EMCharacter::Unknown, two_Lp, delta)
    }

    /// Return a copy with both electromagnetic characters discarded.
    pub fn without_characters(self) -> Self {
        Self {
            em_char: EMCharacter::Unknown,
            em_charp: EMCharacter::Unknown,
            ..self
        }
    }

    /// Describe the transition between two states, e.g.
    /// `"0^+ -- ( M1 , E2 ) --> 1^+"`.
    pub fn notation(&self, initial: &State, fin: &State) -> String {
        format!(
            "{} -- ( {}{} , {}{} ) --> {}",
            initial,
            self.em_char.letter(), self.two_L / 2,
            self.em_charp.letter(), self.two_Lp / 2,
            fin,
        )
    }
}

/// An initial state followed by a chain of at least two transitions and the
/// states they populate.
///
/// A `Cascade` can only be built through [`Cascade::new`], which checks that
/// - each transition has two distinct, whole, nonzero multipolarities,
/// - each transition can couple its adjacent spins through at least one of
///   its multipolarities,
/// - electromagnetic characters are given for both multipolarities of a
///   transition or for neither,
/// - a given character comes with known parities on both sides, and
/// - a given character agrees with the parity change.
#[derive(Clone, Debug, PartialEq)]
pub struct Cascade {
    initial: State,
    steps: Vec<(Transition, State)>,
}

impl Cascade {
    pub fn new(initial: State, steps: Vec<(Transition, State)>)
        -> CascadeResult<Self>
    {
        if steps.len() < 2 {
            return Err(CascadeError::TooFewSteps(steps.len()));
        }
        steps.iter().try_for_each(|(transition, _)| transition.check_multipolarities())?;
        let cascade = Self { initial, steps };
        cascade.check_triangle_inequalities()?;
        cascade.check_em_characters()?;
        Ok(cascade)
    }

    fn check_triangle_inequalities(&self) -> CascadeResult<()> {
        for (s0, transition, s1) in self.transitions() {
            if !triangle(s0.two_J, s1.two_J, transition.two_L)
                && !triangle(s0.two_J, s1.two_J, transition.two_Lp)
            {
                return Err(CascadeError::Triangle(transition.notation(s0, s1)));
            }
        }
        Ok(())
    }

    fn check_em_characters(&self) -> CascadeResult<()> {
        for (s0, transition, s1) in self.transitions() {
            let note = || transition.notation(s0, s1);
            match (transition.em_char.is_known(), transition.em_charp.is_known()) {
                (false, false) => { continue; },
                (true, true) => { },
                _ => { return Err(CascadeError::MissingEMCharacter(note())); },
            }
            if !s0.parity.is_known() || !s1.parity.is_known() {
                return Err(CascadeError::UnknownParity(note()));
            }
            let expected = |two_L: u32| {
                EMCharacter::from_parities(s0.parity, s1.parity, two_L)
            };
            if transition.em_char != expected(transition.two_L)
                || transition.em_charp != expected(transition.two_Lp)
            {
                return Err(CascadeError::InconsistentEMCharacter(note()));
            }
        }
        Ok(())
    }

    /// Iterate over `(initial state, transition, final state)` triples.
    pub fn transitions(&self)
        -> impl Iterator<Item = (&State, &Transition, &State)> + '_
    {
        std::iter::once(&self.initial)
            .chain(self.steps.iter().map(|(_, s)| s))
            .tuple_windows()
            .zip(self.steps.iter().map(|(t, _)| t))
            .map(|((s0, s1), t)| (s0, t, s1))
    }

    pub fn initial(&self) -> &State { &self.initial }

    pub fn steps(&self) -> &[(Transition, State)] { &self.steps }

    /// Number of transitions.
    pub fn len(&self) -> usize { self.steps.len() }

    /// Always `false`; present for symmetry with [`Self::len`].
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Return the `k`-th state, where `k = 0` is the initial state.
    ///
    /// *Panics* if `k > self.len()`.
    pub fn state(&self, k: usize) -> &State {
        if k == 0 { &self.initial } else { &self.steps[k - 1].1 }
    }

    /// Return the `k`-th transition, counting from zero.
    ///
    /// *Panics* if `k >= self.len()`.
    pub fn transition(&self, k: usize) -> &Transition { &self.steps[k].0 }

    /// The final state.
    pub fn last_state(&self) -> &State { &self.steps[self.steps.len() - 1].1 }

    /// Iterate over all states strictly between the initial and the final one.
    pub fn intermediate_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.steps[..self.steps.len() - 1].iter().map(|(_, s)| s)
    }

    /// Return a copy with the mixing ratio of the `k`-th transition replaced.
    ///
    /// *Panics* if `k >= self.len()`.
    pub fn with_mixing_ratio(&self, k: usize, delta: f64) -> Self {
        let mut cascade = self.clone();
        cascade.steps[k].0.delta = delta;
        cascade
    }
}

impl fmt::Display for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial)?;
        for (t, s) in self.steps.iter() {
            write!(f, " -- ( ")?;
            write!(f, "{}{} , ", t.em_char.letter(), t.two_L / 2)?;
            write!(f, "{}{} ) --> {}", t.em_charp.letter(), t.two_Lp / 2, s)?;
        }
        Ok(())
    }
}
