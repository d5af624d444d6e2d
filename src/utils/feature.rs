use crate::Errors;
use anyhow::Result;
use ultraviolet::f32x8;

/// Appearance embedding produced by a re-identification model, stored as SIMD lanes
pub type Feature = Vec<f32x8>;

/// Number of SIMD lanes used to store feature parts internally
pub const FEATURE_LANES_SIZE: usize = 8;

/// Utility trait to get conversion between feature vector representations
///
pub trait FromVec<V, R> {
    fn from_vec(vec: V) -> R;
}

impl FromVec<&Feature, Vec<f32>> for Vec<f32> {
    fn from_vec(vec: &Feature) -> Vec<f32> {
        let mut res = Vec::with_capacity(vec.len() * FEATURE_LANES_SIZE);
        for e in vec {
            res.extend_from_slice(e.as_array_ref());
        }
        res
    }
}

/// Feature from Vec<f32>
///
impl FromVec<Vec<f32>, Feature> for Feature {
    fn from_vec(vec: Vec<f32>) -> Feature {
        Feature::from_vec(vec.as_slice())
    }
}

/// Feature from &[f32]
///
/// The tail that doesn't fill a whole lane block is padded with zeros, which changes neither
/// euclidean nor cosine distances.
///
impl FromVec<&[f32], Feature> for Feature {
    fn from_vec(vec: &[f32]) -> Feature {
        vec.chunks(FEATURE_LANES_SIZE)
            .map(|chunk| {
                let mut acc = [0.0_f32; FEATURE_LANES_SIZE];
                acc[..chunk.len()].copy_from_slice(chunk);
                f32x8::new(acc)
            })
            .collect()
    }
}

/// Feature from an embedding returned by a re-identification model.
///
/// An empty embedding can't be compared with anything, so it's rejected with
/// [Errors::EmptyFeature].
///
pub fn embedding_feature(embedding: Vec<f32>) -> Result<Feature> {
    if embedding.is_empty() {
        return Err(Errors::EmptyFeature.into());
    }
    Ok(Feature::from_vec(embedding))
}

#[cfg(test)]
mod tests {
    use crate::utils::feature::{embedding_feature, Feature, FromVec};
    use crate::Errors;

    #[test]
    fn conv_tests() {
        let v = vec![0.0, 0.2, 0.3];
        let o = Feature::from_vec(v);
        assert_eq!(o.len(), 1);
        let v2 = Vec::from_vec(&o);
        assert_eq!(v2, vec![0.0, 0.2, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn exact_lane_multiple() {
        let v = (0..16).map(|i| i as f32).collect::<Vec<_>>();
        let o = Feature::from_vec(v.as_slice());
        assert_eq!(o.len(), 2);
        assert_eq!(Vec::from_vec(&o), v);
    }

    #[test]
    fn empty_vector() {
        let o = Feature::from_vec(Vec::<f32>::new());
        assert!(o.is_empty());
    }

    #[test]
    fn embeddings() {
        let f = embedding_feature(vec![1.0, 2.0]).unwrap();
        assert_eq!(f.len(), 1);

        let err = embedding_feature(vec![]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Errors>(),
            Some(Errors::EmptyFeature)
        ));
    }
}
