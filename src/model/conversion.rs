use super::layout::WorkflowLayout;
use crate::error::LayoutConversionError;

/// A trait for host canvas formats that can be converted into a `WorkflowLayout`.
///
/// Editors usually persist their canvas in whatever shape their frontend produces.
/// Implementing this trait on those structs gives a single translation point into the
/// layout model the editor loads.
///
/// # Example
///
/// ```rust,no_run
/// use tsunagi::prelude::*;
/// use tsunagi::error::LayoutConversionError;
///
/// struct MyStep { id: String, x: f64, y: f64 }
/// struct MyCanvas { steps: Vec<MyStep> }
///
/// impl IntoLayout for MyCanvas {
///     fn into_layout(self) -> Result<WorkflowLayout, LayoutConversionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|s| {
///                 WorkflowNode::new(s.id, Position::new(s.x, s.y))
///                     .with_input("in", Position::new(0.0, 20.0))
///                     .with_output("out", Position::new(160.0, 20.0))
///             })
///             .collect();
///         Ok(WorkflowLayout::new(nodes, vec![]))
///     }
/// }
/// ```
pub trait IntoLayout {
    /// Consumes the object and converts it into a layout.
    fn into_layout(self) -> Result<WorkflowLayout, LayoutConversionError>;
}

impl IntoLayout for WorkflowLayout {
    fn into_layout(self) -> Result<WorkflowLayout, LayoutConversionError> {
        Ok(self)
    }
}
