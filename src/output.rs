//! Structured and human-readable summaries of a generation run

use crate::emitter::Emitted;
use crate::prompt::Customization;
use crate::request::RenderRequest;
use serde_json::{Map, Value, json};

/// Combined structured and human-readable representation of a run
#[derive(Debug, Clone)]
pub struct RenderedSummary {
    /// Structured JSON representation suitable for scripts
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Describe what was requested and what was written.
pub fn render_summary(
    request: &RenderRequest,
    emitted: &Emitted,
    customization: &Customization,
) -> RenderedSummary {
    let json = summary_value(request, emitted, customization);
    let mut human = Vec::new();

    human.push(format!("  Output: {}", emitted.path.display()));
    human.push(format!(
        "  Payload: {}",
        format_text_snippet(&request.payload)
    ));
    if i64::from(emitted.version) == emitted.requested_version {
        human.push(format!("  Version: {}", emitted.version));
    } else {
        human.push(format!(
            "  Version: {} (requested {}, auto-fitted)",
            emitted.version, emitted.requested_version
        ));
    }
    human.push(format!("  Error correction: {}", request.ec_level));
    human.push(format!(
        "  Size: {} modules, {}x{} px (box {}, border {})",
        emitted.modules, emitted.pixels, emitted.pixels, request.box_size, request.border
    ));
    human.push(format!(
        "  Colors: {} on {}",
        request.fill_color, request.back_color
    ));
    human.push(format!("  Customization: {}", customization_label(customization)));
    if let Customization::Discarded { reason } = customization {
        human.push(format!("    Reason: {reason}"));
    }

    RenderedSummary { json, human }
}

/// Produce a structured JSON representation of the run.
pub fn summary_value(
    request: &RenderRequest,
    emitted: &Emitted,
    customization: &Customization,
) -> Value {
    let mut root = Map::new();
    root.insert(
        "path".to_string(),
        Value::String(emitted.path.display().to_string()),
    );
    root.insert("payload".to_string(), Value::String(request.payload.clone()));
    root.insert(
        "payload_bytes".to_string(),
        Value::from(request.payload.len()),
    );
    root.insert(
        "symbol".to_string(),
        json!({
            "requested_version": emitted.requested_version,
            "version": emitted.version,
            "ec_level": request.ec_level.to_string(),
            "modules": emitted.modules,
        }),
    );
    root.insert(
        "image".to_string(),
        json!({
            "pixels": emitted.pixels,
            "box_size": request.box_size,
            "border": request.border,
            "fill_color": request.fill_color.as_str(),
            "back_color": request.back_color.as_str(),
        }),
    );
    root.insert(
        "customization".to_string(),
        Value::String(customization_label(customization).to_string()),
    );
    if let Customization::Discarded { reason } = customization {
        root.insert("fallback_reason".to_string(), Value::String(reason.clone()));
    }

    Value::Object(root)
}

fn customization_label(customization: &Customization) -> &'static str {
    match customization {
        Customization::Declined => "defaults",
        Customization::Applied => "custom",
        Customization::Discarded { .. } => "fallback",
    }
}

fn format_text_snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        format!("{text:?}")
    } else {
        let snippet: String = text.chars().take(MAX).collect();
        let total = text.chars().count();
        format!("{:?}... ({} chars)", snippet, total)
    }
}
