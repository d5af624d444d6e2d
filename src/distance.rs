use crate::utils::feature::Feature;
use crate::EPS;
use serde::Deserialize;
use std::ops::{Mul, MulAssign, SubAssign};

/// Euclidian distance between two feature vectors
///
/// When the features distances lengths don't match, the longer feature vector is truncated to
/// shorter one when the distance is calculated
///
pub fn euclidean(f1: &Feature, f2: &Feature) -> f32 {
    let mut acc = 0.0;
    for i in 0..f1.len().min(f2.len()) {
        let mut block1 = f1[i];
        let block2 = &f2[i];
        block1.sub_assign(block2);
        block1.mul_assign(block1);
        acc += block1.reduce_add();
    }
    acc.sqrt()
}

/// Cosine similarity between two vectors
///
/// When the features distances lengths don't match, the longer feature vector is truncated to
/// shorter one when the distance is calculated. A zero-length vector has no direction, so its
/// similarity with anything is `0.0`.
///
pub fn cosine(f1: &Feature, f2: &Feature) -> f32 {
    let mut divided = 0.0;
    let len = f1.len().min(f2.len());
    for i in 0..len {
        let mut block1 = f1[i];
        let block2 = &f2[i];
        block1.mul_assign(block2);
        divided += block1.reduce_add();
    }

    let f1_divisor = f1
        .iter()
        .take(len)
        .fold(0.0_f32, |acc, a| acc + a.mul(a).reduce_add());

    let f2_divisor = f2
        .iter()
        .take(len)
        .fold(0.0_f32, |acc, a| acc + a.mul(a).reduce_add());

    let divisor = (f1_divisor * f2_divisor).sqrt();
    if divisor < EPS {
        0.0
    } else {
        divided / divisor
    }
}

/// Metric used to compare re-identification embeddings.
///
/// Both variants are expressed as distances: the smaller, the more similar. Cosine distance is
/// `1 - cosine similarity` and lays within `[0.0, 2.0]`.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMetric {
    #[default]
    Cosine,
    Euclidean,
}

impl EmbeddingMetric {
    pub fn distance(&self, f1: &Feature, f2: &Feature) -> f32 {
        match self {
            EmbeddingMetric::Cosine => 1.0 - cosine(f1, f2),
            EmbeddingMetric::Euclidean => euclidean(f1, f2),
        }
    }
}
