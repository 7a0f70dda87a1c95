// error.rs - Generator error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("grid dimensions must be at least 1x1 (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("template is {template_cols}x{template_rows} but the grid is only {grid_cols}x{grid_rows}")]
    TemplateTooLarge {
        template_cols: usize,
        template_rows: usize,
        grid_cols: usize,
        grid_rows: usize,
    },

    #[error("main path generation exhausted {0} attempts")]
    RetriesExhausted(u32),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
