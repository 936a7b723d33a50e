use crate::error::{Error, Result};

/// Immutable sample set: equal-width feature vectors with a class label each.
///
/// Loaded once and owned by the caller; training and evaluation only borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl Dataset {
    /// Validates that inputs and labels pair up, every input has the same
    /// width, and every label is below `n_classes`.
    pub fn new(inputs: Vec<Vec<f64>>, labels: Vec<usize>, n_classes: usize) -> Result<Dataset> {
        if inputs.len() != labels.len() {
            return Err(Error::InvalidData(format!(
                "{} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        if n_classes < 2 {
            return Err(Error::InvalidData(format!(
                "n_classes must be at least 2, got {n_classes}"
            )));
        }
        if let Some(first) = inputs.first() {
            let width = first.len();
            if width == 0 {
                return Err(Error::InvalidData("inputs must not be empty vectors".into()));
            }
            if let Some(i) = inputs.iter().position(|x| x.len() != width) {
                return Err(Error::InvalidData(format!(
                    "input {i} has {} values, expected {width}",
                    inputs[i].len()
                )));
            }
        }
        if let Some(i) = labels.iter().position(|&y| y >= n_classes) {
            return Err(Error::InvalidData(format!(
                "label at index {i} is {}, out of range for n_classes={n_classes}",
                labels[i]
            )));
        }

        Ok(Dataset { inputs, labels, n_classes })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Width of every feature vector, or 0 for an empty dataset.
    pub fn input_size(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    pub fn input(&self, index: usize) -> Result<&[f64]> {
        self.inputs
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| self.out_of_range(index))
    }

    pub fn label(&self, index: usize) -> Result<usize> {
        self.labels.get(index).copied().ok_or_else(|| self.out_of_range(index))
    }

    /// One-hot target vector of length `n_classes` for sample `index`.
    pub fn one_hot(&self, index: usize) -> Result<Vec<f64>> {
        let mut target = vec![0.0; self.n_classes];
        target[self.label(index)?] = 1.0;
        Ok(target)
    }

    /// First `n` samples (or all of them, if fewer).
    pub fn truncated(&self, n: usize) -> Dataset {
        let n = n.min(self.len());
        Dataset {
            inputs: self.inputs[..n].to_vec(),
            labels: self.labels[..n].to_vec(),
            n_classes: self.n_classes,
        }
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::InvalidInput(format!("sample {index} out of range for {} samples", self.len()))
    }
}
