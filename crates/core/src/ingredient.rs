// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingredient kinds, smoker identities and the pairing table
//!
//! Every smoker permanently holds one ingredient and needs the other two.
//! A smoker is therefore identified by the ingredient it holds.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the three ingredients needed to roll a cigarette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ingredient {
    Tobacco,
    Paper,
    Matches,
}

impl Ingredient {
    pub const ALL: [Ingredient; 3] = [Ingredient::Tobacco, Ingredient::Paper, Ingredient::Matches];

    pub fn name(self) -> &'static str {
        match self {
            Ingredient::Tobacco => "tobacco",
            Ingredient::Paper => "paper",
            Ingredient::Matches => "matches",
        }
    }

    /// The two ingredients a smoker holding `self` must obtain
    pub fn complement(self) -> (Ingredient, Ingredient) {
        match self {
            Ingredient::Tobacco => (Ingredient::Paper, Ingredient::Matches),
            Ingredient::Paper => (Ingredient::Tobacco, Ingredient::Matches),
            Ingredient::Matches => (Ingredient::Tobacco, Ingredient::Paper),
        }
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a smoker: the ingredient it holds an unlimited supply of
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmokerId(pub Ingredient);

impl SmokerId {
    pub const ALL: [SmokerId; 3] = [
        SmokerId(Ingredient::Tobacco),
        SmokerId(Ingredient::Paper),
        SmokerId(Ingredient::Matches),
    ];

    pub fn holds(self) -> Ingredient {
        self.0
    }

    /// Ingredients this smoker must receive before it can roll
    pub fn needs(self) -> (Ingredient, Ingredient) {
        self.0.complement()
    }
}

impl std::fmt::Display for SmokerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "smoker-{}", self.0)
    }
}

/// A pair of reserved ingredients together with the smoker it completes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub first: Ingredient,
    pub second: Ingredient,
    pub winner: SmokerId,
}

/// Pairs in the order they are evaluated when reservations are updated.
///
/// Only the first satisfiable pair is committed per update.
pub const PAIRING_ORDER: [Pairing; 3] = [
    pairing(Ingredient::Tobacco, Ingredient::Paper),
    pairing(Ingredient::Tobacco, Ingredient::Matches),
    pairing(Ingredient::Matches, Ingredient::Paper),
];

/// Build the pairing for two distinct ingredients.
///
/// The winner is the smoker holding the third ingredient. Passing the same
/// ingredient twice yields the smoker holding that ingredient, which never
/// needs it; callers only use distinct ingredients.
pub const fn pairing(first: Ingredient, second: Ingredient) -> Pairing {
    use Ingredient::*;
    let third = match (first, second) {
        (Tobacco, Paper) | (Paper, Tobacco) => Matches,
        (Tobacco, Matches) | (Matches, Tobacco) => Paper,
        (Matches, Paper) | (Paper, Matches) => Tobacco,
        (Tobacco, Tobacco) => Tobacco,
        (Paper, Paper) => Paper,
        (Matches, Matches) => Matches,
    };
    Pairing {
        first,
        second,
        winner: SmokerId(third),
    }
}

/// A fixed value per ingredient kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerIngredient<T> {
    pub tobacco: T,
    pub paper: T,
    pub matches: T,
}

impl<T: Copy> PerIngredient<T> {
    pub fn splat(value: T) -> Self {
        Self {
            tobacco: value,
            paper: value,
            matches: value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ingredient, T)> + '_ {
        Ingredient::ALL.into_iter().map(move |k| (k, self[k]))
    }
}

/// Non-negative per-ingredient counters
pub type IngredientCounts = PerIngredient<u32>;

impl IngredientCounts {
    pub fn new(tobacco: u32, paper: u32, matches: u32) -> Self {
        Self {
            tobacco,
            paper,
            matches,
        }
    }

    pub fn total(&self) -> u32 {
        self.tobacco + self.paper + self.matches
    }
}

impl<T> Index<Ingredient> for PerIngredient<T> {
    type Output = T;

    fn index(&self, kind: Ingredient) -> &T {
        match kind {
            Ingredient::Tobacco => &self.tobacco,
            Ingredient::Paper => &self.paper,
            Ingredient::Matches => &self.matches,
        }
    }
}

impl<T> IndexMut<Ingredient> for PerIngredient<T> {
    fn index_mut(&mut self, kind: Ingredient) -> &mut T {
        match kind {
            Ingredient::Tobacco => &mut self.tobacco,
            Ingredient::Paper => &mut self.paper,
            Ingredient::Matches => &mut self.matches,
        }
    }
}

#[cfg(test)]
#[path = "ingredient_tests.rs"]
mod tests;
