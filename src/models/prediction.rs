//! Prediction request/response models

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::inference::{Prediction, FEATURE_COUNT, SEQUENCE_LENGTH};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Kept as raw JSON so any shape can be reported back
    #[serde(default = "empty_sequence")]
    pub sequence: Value,
}

fn empty_sequence() -> Value {
    Value::Array(Vec::new())
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub anomaly_score: f64,
    pub feature_importance: Option<Vec<f64>>,
    pub status: &'static str,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            anomaly_score: p.anomaly_score,
            feature_importance: p.feature_importance,
            status: "success",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub anomaly_score: f64,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            anomaly_score: 0.0,
        }
    }
}

// ============================================================================
// SHAPE
// ============================================================================

/// Observed dimensions of a nested JSON array.
///
/// Nesting adds a dimension only while every sibling has the same shape,
/// so ragged input stops at the outermost consistent level. Displays as a
/// tuple: `()`, `(0,)`, `(24, 145)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn expected() -> Self {
        Shape(vec![SEQUENCE_LENGTH, FEATURE_COUNT])
    }

    pub fn of(value: &Value) -> Self {
        Shape(dims(value))
    }
}

fn dims(value: &Value) -> Vec<usize> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let mut shape = vec![items.len()];
    let mut children = items.iter().map(dims);
    if let Some(first) = children.next() {
        if children.all(|c| c == first) {
            shape.extend(first);
        }
    }
    shape
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [n] => write!(f, "({},)", n),
            dims => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

// ============================================================================
// SEQUENCE
// ============================================================================

/// Validate shape and element types, producing a dense matrix
pub fn parse_sequence(value: &Value) -> AppResult<Array2<f64>> {
    let shape = Shape::of(value);
    if shape != Shape::expected() {
        return Err(AppError::InvalidShape(shape));
    }

    let mut matrix = Array2::<f64>::zeros((SEQUENCE_LENGTH, FEATURE_COUNT));
    // Shape check guarantees a 24 x 145 array of arrays.
    let rows = value.as_array().into_iter().flatten();
    for (i, row) in rows.enumerate() {
        for (j, cell) in row.as_array().into_iter().flatten().enumerate() {
            // Booleans count as 0/1, like a numeric array constructor casts them.
            let number = cell.as_f64().or_else(|| cell.as_bool().map(f64::from));
            matrix[[i, j]] = number.ok_or_else(|| {
                AppError::BadRequest(format!(
                    "could not convert {} to float at sequence[{}][{}]",
                    cell, i, j
                ))
            })?;
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(rows: usize, cols: usize) -> Value {
        json!(vec![vec![0.0; cols]; rows])
    }

    #[test]
    fn test_shape_rendering() {
        assert_eq!(Shape(vec![]).to_string(), "()");
        assert_eq!(Shape(vec![0]).to_string(), "(0,)");
        assert_eq!(Shape(vec![24, 140]).to_string(), "(24, 140)");
        assert_eq!(Shape(vec![2, 3, 4]).to_string(), "(2, 3, 4)");
    }

    #[test]
    fn test_shape_of_nested_arrays() {
        assert_eq!(Shape::of(&json!([])), Shape(vec![0]));
        assert_eq!(Shape::of(&json!(5)), Shape(vec![]));
        assert_eq!(Shape::of(&json!([[], []])), Shape(vec![2, 0]));
        assert_eq!(Shape::of(&grid(24, 145)), Shape(vec![24, 145]));
        assert_eq!(Shape::of(&grid(145, 24)), Shape(vec![145, 24]));
        assert_eq!(Shape::of(&json!([[[1], [2]]])), Shape(vec![1, 2, 1]));
    }

    #[test]
    fn test_shape_of_ragged() {
        let mut rows = vec![vec![0.0; 145]; 24];
        rows[5].pop();

        assert_eq!(Shape::of(&json!(rows)), Shape(vec![24]));
        assert_eq!(Shape::of(&json!([1, [2]])), Shape(vec![2]));
    }

    #[test]
    fn test_parse_valid_sequence() {
        let mut rows = vec![vec![0.0; 145]; 24];
        rows[23][144] = 7.5;

        let matrix = parse_sequence(&json!(rows)).unwrap();

        assert_eq!(matrix.dim(), (24, 145));
        assert_eq!(matrix[[23, 144]], 7.5);
    }

    #[test]
    fn test_parse_wrong_width() {
        match parse_sequence(&grid(24, 140)) {
            Err(AppError::InvalidShape(shape)) => assert_eq!(shape.to_string(), "(24, 140)"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_numeric_element() {
        let mut rows = vec![vec![json!(0.0); 145]; 24];
        rows[3][7] = json!("abc");

        match parse_sequence(&json!(rows)) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("sequence[3][7]")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_booleans_as_numbers() {
        let mut rows = vec![vec![json!(0.5); 145]; 24];
        rows[23][0] = json!(true);
        rows[23][1] = json!(false);

        let matrix = parse_sequence(&json!(rows)).unwrap();

        assert_eq!(matrix[[23, 0]], 1.0);
        assert_eq!(matrix[[23, 1]], 0.0);
        assert_eq!(matrix[[23, 2]], 0.5);
    }

    #[test]
    fn test_missing_sequence_defaults_to_empty() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(Shape::of(&req.sequence).to_string(), "(0,)");
    }

    #[test]
    fn test_success_response_serialization() {
        let resp = PredictResponse::from(Prediction {
            anomaly_score: 0.25,
            feature_importance: None,
        });
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["anomaly_score"], 0.25);
        assert!(json["feature_importance"].is_null());
        assert_eq!(json["status"], "success");
    }
}
