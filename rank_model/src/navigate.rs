use log::debug;
use snafu::prelude::*;
use std::cmp::Ordering as CmpOrdering;

use crate::config::*;
use crate::possible::PossibleValues;
use crate::weights::{AnswerWeights, WeightTable};

/// The values picked by the user, per characteristic.
///
/// Values are kept in their displayed (string) form and resolved against the
/// possible values when the selection is applied. The selection is a plain
/// value: going back or resetting is applying another selection.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Selection {
    picks: Vec<(String, Vec<String>)>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    /// Adds a value to a characteristic. Picking several values of the same
    /// characteristic accepts any of them.
    pub fn pick(mut self, characteristic: &str, value: &str) -> Selection {
        match self.picks.iter_mut().find(|(c, _)| c == characteristic) {
            Some((_, values)) => {
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
            None => self
                .picks
                .push((characteristic.to_string(), vec![value.to_string()])),
        }
        self
    }

    /// Picks the value, or removes it if it was already picked (what a click
    /// on an option does).
    pub fn toggle(mut self, characteristic: &str, value: &str) -> Selection {
        let picked = self
            .picks
            .iter()
            .any(|(c, values)| c == characteristic && values.iter().any(|v| v == value));
        if !picked {
            return self.pick(characteristic, value);
        }
        for (c, values) in self.picks.iter_mut() {
            if c == characteristic {
                values.retain(|v| v != value);
            }
        }
        self.picks.retain(|(_, values)| !values.is_empty());
        self
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Selection {
        pairs
            .into_iter()
            .fold(Selection::new(), |sel, (c, v)| sel.pick(c, v))
    }

    /// Reads a `characteristic=value` pick.
    pub fn parse_pair(raw: &str) -> Result<(String, String), NavigationError> {
        let (c, v) = raw.split_once('=').context(MalformedPickSnafu { raw })?;
        ensure!(!c.trim().is_empty(), MalformedPickSnafu { raw });
        Ok((c.trim().to_string(), v.trim().to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<String>)> {
        self.picks.iter()
    }

    fn is_pinned(&self, characteristic: &str) -> bool {
        self.picks
            .iter()
            .any(|(c, values)| c == characteristic && values.len() == 1)
    }

    fn is_picked(&self, characteristic: &str, value: &Value) -> bool {
        let shown = value.to_string();
        self.picks
            .iter()
            .any(|(c, values)| c == characteristic && values.iter().any(|v| *v == shown))
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankedAnswer {
    pub answer: Value,
    /// Combined score in [0, 1].
    pub score: f64,
}

impl RankedAnswer {
    /// The score as displayed on the pages.
    pub fn percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OptionCount {
    pub value: Value,
    /// Number of remaining answers holding this value.
    pub count: usize,
    pub selected: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CharacteristicOptions {
    pub name: String,
    pub options: Vec<OptionCount>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct NavigationResult {
    pub ranked: Vec<RankedAnswer>,
    /// The characteristics that can still narrow the result, in table order.
    pub options: Vec<CharacteristicOptions>,
}

impl NavigationResult {
    /// Nothing left to narrow: a single answer or every characteristic pinned.
    pub fn is_terminal(&self) -> bool {
        self.ranked.len() <= 1 || self.options.is_empty()
    }
}

/// Filters and ranks answers from the static weight table.
///
/// The navigator only reads the tables it is given; it can be shared freely.
pub struct Navigator<'a> {
    weights: &'a WeightTable,
    possible: &'a PossibleValues,
    answer_column: &'a str,
}

impl<'a> Navigator<'a> {
    pub fn new(
        weights: &'a WeightTable,
        possible: &'a PossibleValues,
        answer_column: &'a str,
    ) -> Navigator<'a> {
        Navigator {
            weights,
            possible,
            answer_column,
        }
    }

    /// Applies a selection.
    ///
    /// An answer is kept only if, for every characteristic of the selection,
    /// one of the picked values has a non-zero weight. The score of an answer
    /// for one characteristic is its best weight among the picked values; the
    /// scores of the characteristics are combined following `policy`. Answers
    /// are sorted by decreasing score, ties keeping the table order.
    pub fn apply_selection(
        &self,
        selection: &Selection,
        policy: RankingPolicy,
    ) -> Result<NavigationResult, NavigationError> {
        let resolved = self.resolve(selection)?;
        debug!("apply_selection: resolved selection: {:?}", resolved);

        let mut ranked: Vec<RankedAnswer> = Vec::new();
        let mut candidates: Vec<&AnswerWeights> = Vec::new();
        for aw in self.weights.answers().iter() {
            if let Some(score) = score_answer(aw, &resolved, policy) {
                ranked.push(RankedAnswer {
                    answer: aw.answer.clone(),
                    score,
                });
                candidates.push(aw);
            }
        }
        // Stable: equal scores keep the table order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(CmpOrdering::Equal));
        debug!(
            "apply_selection: {} of {} answers remaining",
            ranked.len(),
            self.weights.answers().len()
        );

        let options = self.remaining_options(selection, &candidates);
        Ok(NavigationResult { ranked, options })
    }

    fn resolve(&self, selection: &Selection) -> Result<Vec<(&'a str, Vec<Value>)>, NavigationError> {
        let mut res: Vec<(&'a str, Vec<Value>)> = Vec::new();
        for (name, raw_values) in selection.iter() {
            let (column, _) = self
                .characteristics()
                .find(|(c, _)| *c == name.as_str())
                .context(UnknownCharacteristicSnafu { name })?;
            let mut values: Vec<Value> = Vec::new();
            for raw in raw_values.iter() {
                let v = self
                    .possible
                    .resolve(column, raw)
                    .context(UnknownValueSnafu { name, value: raw })?;
                values.push(v.clone());
            }
            res.push((column, values));
        }
        Ok(res)
    }

    fn characteristics(&self) -> impl Iterator<Item = (&'a str, &'a Vec<Value>)> {
        let answer_column = self.answer_column;
        self.possible
            .iter()
            .filter(move |(name, _)| name.as_str() != answer_column)
            .map(|(name, values)| (name.as_str(), values))
    }

    fn remaining_options(
        &self,
        selection: &Selection,
        candidates: &[&AnswerWeights],
    ) -> Vec<CharacteristicOptions> {
        let mut res: Vec<CharacteristicOptions> = Vec::new();
        for (name, values) in self.characteristics() {
            if selection.is_pinned(name) {
                continue;
            }
            let options: Vec<OptionCount> = values
                .iter()
                .filter_map(|v| {
                    let count = candidates
                        .iter()
                        .filter(|aw| weight_of(aw, name, v) >= 1.0)
                        .count();
                    if count == 0 {
                        return None;
                    }
                    Some(OptionCount {
                        value: v.clone(),
                        count,
                        selected: selection.is_picked(name, v),
                    })
                })
                .collect();
            if !options.is_empty() {
                res.push(CharacteristicOptions {
                    name: name.to_string(),
                    options,
                });
            }
        }
        res
    }
}

fn weight_of(aw: &AnswerWeights, characteristic: &str, value: &Value) -> f64 {
    aw.get(characteristic)
        .and_then(|w| w.get(value))
        .unwrap_or(0.0)
}

// None if the answer is filtered out.
fn score_answer(
    aw: &AnswerWeights,
    resolved: &[(&str, Vec<Value>)],
    policy: RankingPolicy,
) -> Option<f64> {
    if resolved.is_empty() {
        return Some(1.0);
    }
    let mut scores: Vec<f64> = Vec::new();
    for (name, values) in resolved.iter() {
        let best = values
            .iter()
            .map(|v| weight_of(aw, name, v))
            .fold(0.0, f64::max);
        if best <= 0.0 {
            return None;
        }
        scores.push(best);
    }
    let combined = match policy {
        RankingPolicy::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
        RankingPolicy::Product => scores.iter().product(),
    };
    Some(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderRegistry;
    use crate::table::tests::raw;
    use crate::table::{parse_table, DataTypes};
    use crate::weights::compute_weights;

    const EPS: f64 = 1e-9;

    fn pairs(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    struct Fixture {
        weights: WeightTable,
        possible: PossibleValues,
    }

    impl Fixture {
        fn navigator(&self) -> Navigator<'_> {
            Navigator::new(&self.weights, &self.possible, "name")
        }
    }

    fn fixture() -> Fixture {
        let types = DataTypes::from_raw(&pairs(&[("color", "str list"), ("legs", "int")])).unwrap();
        let table = parse_table(
            &raw(
                &["name", "color", "size", "legs"],
                &[
                    &["table", "red, blue", "large", "4"],
                    &["stool", "red", "small", "3"],
                    &["bench", "green", "large", "4"],
                    &["chair", "blue", "medium", "4"],
                ],
            ),
            &types,
            None,
        )
        .unwrap();
        let orders =
            OrderRegistry::from_raw(&pairs(&[("size", "small, medium, large")]), &types).unwrap();
        let possible = PossibleValues::build(&table, &orders);
        let weights = compute_weights(&table, &orders, &possible).unwrap();
        Fixture { weights, possible }
    }

    fn names(res: &NavigationResult) -> Vec<String> {
        res.ranked.iter().map(|r| r.answer.to_string()).collect()
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let f = fixture();
        let res = f
            .navigator()
            .apply_selection(&Selection::new(), RankingPolicy::Mean)
            .unwrap();
        assert_eq!(names(&res), vec!["table", "stool", "bench", "chair"]);
        assert!(res.ranked.iter().all(|r| r.score == 1.0));
        let option_names: Vec<&str> = res.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(option_names, vec!["color", "size", "legs"]);
    }

    #[test]
    fn zero_weight_is_filtered_out() {
        let f = fixture();
        let sel = Selection::new().pick("color", "red");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        assert_eq!(names(&res), vec!["table", "stool"]);
    }

    #[test]
    fn or_within_and_across() {
        let f = fixture();
        let sel = Selection::new()
            .pick("color", "green")
            .pick("color", "blue");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        assert_eq!(names(&res), vec!["table", "bench", "chair"]);

        let sel = sel.pick("legs", "4").pick("color", "green");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        assert_eq!(names(&res), vec!["table", "bench", "chair"]);

        let sel = Selection::new().pick("color", "red").pick("legs", "4");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        assert_eq!(names(&res), vec!["table"]);
        assert!(res.is_terminal());
    }

    #[test]
    fn ordered_characteristics_rank() {
        let f = fixture();
        let sel = Selection::new().pick("size", "small");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        // stool is small, chair medium, table and bench large (ties keep table order).
        assert_eq!(names(&res), vec!["stool", "chair", "table", "bench"]);
        assert_eq!(res.ranked[0].score, 1.0);
        assert!((res.ranked[1].score - 2.0 / 3.0).abs() < EPS);
        assert!((res.ranked[2].score - 1.0 / 3.0).abs() < EPS);
        assert_eq!(res.ranked[1].percent(), 67);
    }

    #[test]
    fn ranking_policies() {
        let f = fixture();
        let sel = Selection::new().pick("size", "small").pick("legs", "4");
        let mean = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        let product = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Product)
            .unwrap();
        assert_eq!(names(&mean), vec!["chair", "table", "bench"]);
        assert_eq!(names(&product), vec!["chair", "table", "bench"]);
        assert!((mean.ranked[0].score - (1.0 + 2.0 / 3.0) / 2.0).abs() < EPS);
        assert!((product.ranked[0].score - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn remaining_options_counts() {
        let f = fixture();
        let sel = Selection::new().pick("legs", "4");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        // legs is pinned and disappears from the options.
        let option_names: Vec<&str> = res.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(option_names, vec!["color", "size"]);
        let color = &res.options[0].options;
        let counts: Vec<(String, usize)> = color
            .iter()
            .map(|o| (o.value.to_string(), o.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("blue".to_string(), 2),
                ("green".to_string(), 1),
                ("red".to_string(), 1)
            ]
        );
        // "small" belongs to the stool only, which is filtered out.
        let size: Vec<String> = res.options[1]
            .options
            .iter()
            .map(|o| o.value.to_string())
            .collect();
        assert_eq!(size, vec!["medium", "large"]);
    }

    #[test]
    fn multiple_values_are_not_pinned() {
        let f = fixture();
        let sel = Selection::new().pick("color", "red").pick("color", "blue");
        let res = f
            .navigator()
            .apply_selection(&sel, RankingPolicy::Mean)
            .unwrap();
        let color = res.options.iter().find(|o| o.name == "color").unwrap();
        let selected: Vec<String> = color
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.to_string())
            .collect();
        assert_eq!(selected, vec!["blue", "red"]);
    }

    #[test]
    fn unknown_picks() {
        let f = fixture();
        let nav = f.navigator();
        assert_eq!(
            nav.apply_selection(&Selection::new().pick("weight", "1"), RankingPolicy::Mean),
            Err(NavigationError::UnknownCharacteristic {
                name: "weight".to_string()
            })
        );
        assert_eq!(
            nav.apply_selection(&Selection::new().pick("name", "table"), RankingPolicy::Mean),
            Err(NavigationError::UnknownCharacteristic {
                name: "name".to_string()
            })
        );
        assert!(matches!(
            nav.apply_selection(&Selection::new().pick("legs", "5"), RankingPolicy::Mean),
            Err(NavigationError::UnknownValue { .. })
        ));
    }

    #[test]
    fn toggling() {
        let sel = Selection::new().toggle("color", "red");
        assert!(!sel.is_empty());
        let sel = sel.toggle("color", "red");
        assert!(sel.is_empty());
        assert_eq!(
            Selection::from_pairs(vec![("color", "red"), ("color", "red")]),
            Selection::new().pick("color", "red")
        );
    }

    #[test]
    fn parse_pairs() {
        assert_eq!(
            Selection::parse_pair("color = red"),
            Ok(("color".to_string(), "red".to_string()))
        );
        assert!(Selection::parse_pair("color").is_err());
        assert!(Selection::parse_pair("=red").is_err());
    }
}
