//! Chart specification resolver.
//!
//! Turns a chart kind plus the user's field choices into a declarative
//! [`ChartSpec`]. Nothing here draws; the renderer receives the spec.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::{ColorMap, ColorScheme};
use crate::data::model::Dataset;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Chart kinds and field roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    #[serde(rename = "3d-scatter")]
    Scatter3d,
    Area,
}

/// A slot of a chart that a column can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    X,
    Y,
    Z,
    Category,
}

impl FieldRole {
    pub const ALL: [FieldRole; 4] = [
        FieldRole::X,
        FieldRole::Y,
        FieldRole::Z,
        FieldRole::Category,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldRole::X => "x",
            FieldRole::Y => "y",
            FieldRole::Z => "z",
            FieldRole::Category => "category",
        }
    }

    /// Axis roles take numeric columns; a category may be any column.
    pub fn needs_numeric(self) -> bool {
        !matches!(self, FieldRole::Category)
    }

    /// Roles every request may carry. Pie ignores x, but x is still an axis
    /// choice and is checked like one.
    pub fn always_accepted(self) -> bool {
        matches!(self, FieldRole::X | FieldRole::Y)
    }
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter3d,
        ChartKind::Area,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter3d => "3d-scatter",
            ChartKind::Area => "area",
        }
    }

    /// Display label, as offered in a chart picker.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Scatter3d => "3D Scatter Plot",
            ChartKind::Area => "Area Chart",
        }
    }

    pub fn required_roles(self) -> &'static [FieldRole] {
        match self {
            ChartKind::Bar | ChartKind::Line | ChartKind::Area => &[FieldRole::X, FieldRole::Y],
            ChartKind::Pie => &[FieldRole::Category, FieldRole::Y],
            ChartKind::Scatter3d => &[FieldRole::X, FieldRole::Y, FieldRole::Z],
        }
    }

    pub fn color_scheme(self) -> ColorScheme {
        match self {
            ChartKind::Bar => ColorScheme::Bold,
            ChartKind::Line => ColorScheme::Pastel,
            ChartKind::Pie => ColorScheme::Safe,
            ChartKind::Scatter3d | ChartKind::Area => ColorScheme::Plotly,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChartKind {
    type Err = PipelineError;

    /// Accepts slugs (`bar`, `3d-scatter`) and display labels (`Bar Chart`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|k| {
                k.slug().eq_ignore_ascii_case(wanted) || k.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PipelineError::InvalidField(format!("unknown chart kind '{wanted}'")))
    }
}

// ---------------------------------------------------------------------------
// Request / spec
// ---------------------------------------------------------------------------

/// The selections a user made for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x_field: Option<String>,
    pub y_field: Option<String>,
    pub z_field: Option<String>,
    pub category_field: Option<String>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            x_field: None,
            y_field: None,
            z_field: None,
            category_field: None,
        }
    }

    /// Start a request from a kind name; unknown names are `InvalidField`.
    pub fn named(kind: &str) -> Result<Self> {
        Ok(Self::new(kind.parse()?))
    }

    pub fn x(mut self, field: impl Into<String>) -> Self {
        self.x_field = Some(field.into());
        self
    }

    pub fn y(mut self, field: impl Into<String>) -> Self {
        self.y_field = Some(field.into());
        self
    }

    pub fn z(mut self, field: impl Into<String>) -> Self {
        self.z_field = Some(field.into());
        self
    }

    pub fn category(mut self, field: impl Into<String>) -> Self {
        self.category_field = Some(field.into());
        self
    }

    pub fn field(&self, role: FieldRole) -> Option<&str> {
        match role {
            FieldRole::X => self.x_field.as_deref(),
            FieldRole::Y => self.y_field.as_deref(),
            FieldRole::Z => self.z_field.as_deref(),
            FieldRole::Category => self.category_field.as_deref(),
        }
    }
}

/// Fully resolved, render-ready chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_field: Option<String>,
    pub y_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_field: Option<String>,
    /// Column whose values colour the marks (3D scatter only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_field: Option<String>,
    pub color_scheme: ColorScheme,
}

impl ChartSpec {
    /// Legend colours for the category or colour column, if the chart has one.
    pub fn color_map(&self, dataset: &Dataset) -> Option<ColorMap> {
        let column = self.category_field.as_ref().or(self.color_field.as_ref())?;
        let values = dataset.column(column)?.unique_values();
        Some(ColorMap::new(column, &values, self.color_scheme))
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Validate `request` against `dataset` and produce a [`ChartSpec`].
///
/// Fails with `NoNumericColumns` before looking at any field when the dataset
/// has nothing to plot. Every role the kind requires must be filled. A z or
/// category field on a kind that has no such role is rejected; an x on a pie
/// chart is validated and carried along. The same column may fill several
/// roles.
pub fn resolve(dataset: &Dataset, request: &ChartRequest) -> Result<ChartSpec> {
    if dataset.numeric_columns().is_empty() {
        return Err(PipelineError::NoNumericColumns);
    }

    let kind = request.kind;
    let required = kind.required_roles();
    for role in FieldRole::ALL {
        if !role.always_accepted() && !required.contains(&role) {
            if let Some(field) = request.field(role) {
                return Err(PipelineError::InvalidField(format!(
                    "{} takes no {} field (got '{field}')",
                    kind.label(),
                    role.name()
                )));
            }
        }
    }

    let take = |role: FieldRole| -> Result<String> {
        let field = request.field(role).ok_or_else(|| {
            PipelineError::InvalidField(format!(
                "{} requires a {} field",
                kind.label(),
                role.name()
            ))
        })?;
        check_field(dataset, role, field)?;
        Ok(field.to_string())
    };
    let take_optional = |role: FieldRole| -> Result<Option<String>> {
        request.field(role).map_or(Ok(None), |_| take(role).map(Some))
    };

    let spec = match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => ChartSpec {
            kind,
            x_field: Some(take(FieldRole::X)?),
            y_field: take(FieldRole::Y)?,
            z_field: None,
            category_field: None,
            color_field: None,
            color_scheme: kind.color_scheme(),
        },
        ChartKind::Pie => ChartSpec {
            kind,
            x_field: take_optional(FieldRole::X)?,
            y_field: take(FieldRole::Y)?,
            z_field: None,
            category_field: Some(take(FieldRole::Category)?),
            color_field: None,
            color_scheme: kind.color_scheme(),
        },
        ChartKind::Scatter3d => ChartSpec {
            kind,
            x_field: Some(take(FieldRole::X)?),
            y_field: take(FieldRole::Y)?,
            z_field: Some(take(FieldRole::Z)?),
            category_field: None,
            color_field: dataset.all_columns().first().cloned(),
            color_scheme: kind.color_scheme(),
        },
    };

    Ok(spec)
}

fn check_field(dataset: &Dataset, role: FieldRole, field: &str) -> Result<()> {
    if role.needs_numeric() {
        if !dataset.is_numeric(field) {
            let reason = if dataset.has_column(field) {
                "is not numeric"
            } else {
                "does not exist"
            };
            return Err(PipelineError::InvalidField(format!(
                "{} field '{field}' {reason}",
                role.name()
            )));
        }
    } else if !dataset.has_column(field) {
        return Err(PipelineError::InvalidField(format!(
            "{} field '{field}' does not exist",
            role.name()
        )));
    }
    Ok(())
}
