//! Prompt construction for the two derived columns.
//!
//! `decoded_tags` turns free text into structured vulnerability keywords.
//! `route_analysis` picks one facility from the shelter listing and declares a
//! prompt dependency on `decoded_tags`, so the table service evaluates decode
//! first and substitutes its output into the routing prompt.

use super::types::RouteRequest;
use crate::config::KnowledgeConfig;
use crate::table::{DECODED_TAGS_COLUMN, ROUTE_ANALYSIS_COLUMN, SELECTED_FACILITY_COLUMN};
use serde_json::{json, Value};

/// Marker the table service replaces with the `decoded_tags` output.
pub const DECODED_TAGS_PLACEHOLDER: &str = "<PLACEHOLDER_FOR_DECODED_TAGS>";

pub const DECODE_SYSTEM_PROMPT: &str = "You are a data decoder. Analyse the emergency \
situation and list the distinct vulnerabilities, special needs and family details relevant \
to a relief centre (PPS). Output ONLY a comma-separated list of keywords. Family size is \
mandatory (e.g. '5 Pax'); when nothing else is mentioned output only the 'X Pax' tag. Other \
keywords: 'Warga Emas/Bedridden', 'Pet/Cat', 'Wheelchair User (OKU)', 'Dietary Restrictions'. \
Do not include any other text.";

pub const ROUTE_SYSTEM_PROMPT: &str = "You are an emergency management AI. Ground every \
recommendation in the supplied SOP and relief centre listing. Compare the user's \
vulnerabilities with each centre and select the single best-suited one, giving a concise \
explanation of why centres are accepted or rejected. Finish with the decision on its own \
final line in exactly this form: BEST MATCH: <centre name> (e.g. BEST MATCH: PPS North \
(Sekolah)). Do not write anything after the BEST MATCH line.";

/// Routing query sent as the `route_analysis` prompt.
pub fn routing_query(request: &RouteRequest, knowledge: &KnowledgeConfig) -> String {
    format!(
        "User Needs: {placeholder}.\nLocation: {location}.\nSOP: {sop}\n{shelters}\n",
        placeholder = DECODED_TAGS_PLACEHOLDER,
        location = location_or_unknown(request),
        sop = knowledge.sop,
        shelters = knowledge.shelters,
    )
}

/// Template the service fills with the dependency's `{result}`.
fn dependency_template(request: &RouteRequest, knowledge: &KnowledgeConfig) -> String {
    format!(
        "User Needs: {{result}}. Location: {location}. SOP: {sop}\n\n{shelters}",
        location = location_or_unknown(request),
        sop = knowledge.sop,
        shelters = knowledge.shelters,
    )
}

fn location_or_unknown(request: &RouteRequest) -> &str {
    match request.location_details().trim() {
        "" => "N/A",
        loc => loc,
    }
}

/// `completion_columns` object declaring both derived columns.
pub fn completion_columns(
    request: &RouteRequest,
    knowledge: &KnowledgeConfig,
    model: &str,
) -> Value {
    json!({
        DECODED_TAGS_COLUMN: {
            "model": model,
            "prompt": request.user_input(),
            "system_instruction": DECODE_SYSTEM_PROMPT,
        },
        ROUTE_ANALYSIS_COLUMN: {
            "model": model,
            "prompt": routing_query(request, knowledge),
            "system_instruction": ROUTE_SYSTEM_PROMPT,
            "prompt_dependencies": {
                DECODED_TAGS_COLUMN: dependency_template(request, knowledge),
            },
        },
    })
}

/// Plain input columns of the routing table, routing and knowledge rows alike.
const INPUT_COLUMNS: [&str; 7] = [
    "action",
    "user_input",
    "location_details",
    "created_at",
    "title",
    "text",
    "source",
];

const SELECT_SYSTEM_PROMPT: &str = "Copy the centre name from the BEST MATCH line of the \
analysis. Output only the name, without the 'BEST MATCH:' prefix or trailing punctuation.";

/// Create-table body declaring the input columns and the three derived columns.
///
/// Column-level prompts reference other columns with `${column}`; per-row
/// `completion_columns` sent on submission take precedence over them.
pub fn table_schema(table_id: &str, model: &str) -> Value {
    let mut cols: Vec<Value> = INPUT_COLUMNS
        .iter()
        .map(|id| json!({ "id": id, "dtype": "str" }))
        .collect();

    cols.push(json!({
        "id": DECODED_TAGS_COLUMN,
        "dtype": "str",
        "gen_config": {
            "model": model,
            "system_prompt": DECODE_SYSTEM_PROMPT,
            "prompt": "${user_input}",
        },
    }));
    cols.push(json!({
        "id": ROUTE_ANALYSIS_COLUMN,
        "dtype": "str",
        "gen_config": {
            "model": model,
            "system_prompt": ROUTE_SYSTEM_PROMPT,
            "prompt": format!(
                "User Needs: ${{{DECODED_TAGS_COLUMN}}}. Location: ${{location_details}}."
            ),
        },
    }));
    cols.push(json!({
        "id": SELECTED_FACILITY_COLUMN,
        "dtype": "str",
        "gen_config": {
            "model": model,
            "system_prompt": SELECT_SYSTEM_PROMPT,
            "prompt": format!("${{{ROUTE_ANALYSIS_COLUMN}}}"),
        },
    }));

    json!({
        "id": table_id,
        "table_id": table_id,
        "title": "Emergency Routing Workflow Log",
        "is_action_table": true,
        "cols": cols,
    })
}
