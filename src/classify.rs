// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::model::Quantization;

/// A class index paired with its raw score and dequantized confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    /// index into the label table for this class
    pub index: usize,
    /// raw signed score from the output tensor, higher implies more
    /// confidence
    pub score: i8,
    /// score mapped through the output quantization parameters
    pub confidence: f32,
}

/// Index of the highest score. Ties resolve to the lowest index, so the
/// result is deterministic for any input.
pub fn arg_max(scores: &[i8]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }

    let (_, index) = scores
        .iter()
        .enumerate()
        .fold((scores[0], 0), |(max, arg_max), (ind, s)| {
            if max >= *s { (max, arg_max) } else { (*s, ind) }
        });
    Some(index)
}

/// Ranks the output scores in descending order into the caller's vector,
/// bounded by its capacity. Ordering is total: descending score, then
/// ascending index.
pub fn rank_scores(scores: &[i8], quant: Quantization, output: &mut Vec<ClassScore>) {
    let mut ranked: Vec<ClassScore> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| ClassScore {
            index,
            score,
            confidence: quant.dequantize(score),
        })
        .collect();
    ranked.sort_unstable_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));

    let len = output.capacity().min(ranked.len());
    output.clear();
    output.extend(ranked.into_iter().take(len));
}

/// Human-readable label table for the classifier output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    labels: Vec<String>,
}

impl Labels {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for a class index. Out-of-range indices resolve to a
    /// placeholder rather than panicking.
    pub fn get(&self, index: usize) -> &str {
        self.labels
            .get(index)
            .map(String::as_str)
            .unwrap_or("<unlabelled>")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_max() {
        assert_eq!(arg_max(&[]), None);
        assert_eq!(arg_max(&[5]), Some(0));
        assert_eq!(arg_max(&[-3, 9, 4]), Some(1));
        assert_eq!(arg_max(&[-128, -127, -128]), Some(1));
    }

    #[test]
    fn test_arg_max_ties_to_lowest_index() {
        assert_eq!(arg_max(&[7, 2, 7, 7]), Some(0));
        assert_eq!(arg_max(&[1, 3, 3]), Some(1));
    }

    #[test]
    fn test_arg_max_matches_maximum() {
        let scores: Vec<i8> = (0..100).map(|i| ((i * 67) % 251) as i8).collect();
        let index = arg_max(&scores).expect("Failed to scan scores");
        let max = *scores.iter().max().expect("empty scores");
        assert_eq!(scores[index], max);
    }

    #[test]
    fn test_rank_scores() {
        let quant = Quantization::new(0.5, -2);
        let mut ranked = Vec::with_capacity(2);
        rank_scores(&[-5, 20, 3, 20], quant, &mut ranked);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].score, 20);
        assert_eq!(ranked[0].confidence, 11.0);
        assert_eq!(ranked[1].index, 3);
        assert_eq!(ranked[1].score, 20);
    }

    #[test]
    fn test_rank_scores_capacity_bound() {
        let mut ranked = Vec::with_capacity(3);
        rank_scores(&[1, 2], Quantization::default(), &mut ranked);
        assert_eq!(ranked.len(), 2);

        rank_scores(&[9, 8, 7, 6, 5], Quantization::default(), &mut ranked);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].index, 0);
    }

    #[test]
    fn test_labels() {
        let labels = Labels::new(vec!["person".to_string(), "no person".to_string()]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(0), "person");
        assert_eq!(labels.get(7), "<unlabelled>");
    }
}
