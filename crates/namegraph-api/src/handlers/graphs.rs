//! Co-occurrence graph handlers

use crate::error::AppError;
use crate::stylesheet::StyleRule;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use namegraph_core::SegmentLevel;
use namegraph_graph::{GraphElements, GraphStats};
use serde::Serialize;
use std::sync::Arc;

/// One diagram: elements, stylesheet and summary
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub level: SegmentLevel,
    /// Prefix shown in the hover readout
    pub label: String,
    pub elements: GraphElements,
    pub stylesheet: Vec<StyleRule>,
    pub stats: GraphStats,
}

/// A ranked subject of interest
#[derive(Debug, Serialize)]
pub struct SubjectEntry {
    pub rank: usize,
    pub name: String,
    pub count: u32,
    /// Rendered in the highlight colour
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    pub top_n: usize,
    /// Person mentions counted after canonicalization and exclusion
    pub total_mentions: u64,
    pub subjects: Vec<SubjectEntry>,
}

/// Elements and stylesheet for the sentence or paragraph diagram
pub async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(level): Path<String>,
) -> Result<Json<GraphResponse>, AppError> {
    let level: SegmentLevel = level
        .parse()
        .map_err(|_| AppError::NotFound(format!("Graph level '{level}'")))?;
    let graph = state.analysis.graph(level);

    Ok(Json(GraphResponse {
        level,
        label: level.display_name().to_string(),
        elements: graph.to_elements(),
        stylesheet: state.stylesheet(level),
        stats: graph.stats(),
    }))
}

/// Subjects of interest, most frequent first
pub async fn list_subjects(State(state): State<Arc<AppState>>) -> Json<SubjectsResponse> {
    let names = &state.config.names;
    let subjects = state
        .analysis
        .ranked_subjects()
        .into_iter()
        .enumerate()
        .map(|(idx, (name, count))| SubjectEntry {
            rank: idx + 1,
            name: name.to_string(),
            count,
            highlighted: names.is_highlighted(name),
        })
        .collect();

    Json(SubjectsResponse {
        top_n: state.config.analysis.top_n,
        total_mentions: state.analysis.frequencies.total(),
        subjects,
    })
}
