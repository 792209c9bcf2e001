use crate::{
    data::{Body, Headers, InteractionData, InteractionGroup, Line, RequestData, ResponseData},
    diff::{
        BodyDiff, DiffReport, GroupDiff, HeaderDiff, InteractionDiff, LineEdit, RequestDiff,
        ResponseDiff, ValueDiff,
    },
    line_diff::Tag,
};
use serde::Serialize;
use serde_json::{json, Value};

pub(super) fn render(report: &DiffReport, show_equal: bool) -> Value {
    let summary = report.summary();

    json!({
        "tag": if report.has_differences() { Tag::Replace } else { Tag::Equal },
        "summary": {
            "equal": summary.equal,
            "inserted": summary.inserted,
            "deleted": summary.deleted,
            "replaced": summary.replaced,
        },
        "groups": report
            .groups
            .iter()
            .map(|group| render_group_diff(group, show_equal))
            .collect::<Vec<_>>(),
    })
}

fn render_group_diff(group: &GroupDiff, show_equal: bool) -> Value {
    match group {
        GroupDiff::Compared {
            index,
            name,
            interactions,
        } => json!({
            "index": index,
            "tag": group.tag(),
            "name": render_value_diff(name),
            "interactions": interactions
                .iter()
                .map(|interaction| render_interaction_diff(interaction, show_equal))
                .collect::<Vec<_>>(),
        }),
        GroupDiff::Inserted { index, group: only } | GroupDiff::Deleted { index, group: only } => {
            json!({
                "index": index,
                "tag": group.tag(),
                "group": render_group(only),
            })
        }
    }
}

fn render_interaction_diff(interaction: &InteractionDiff, show_equal: bool) -> Value {
    match interaction {
        InteractionDiff::Compared {
            index,
            request,
            response,
        } => json!({
            "index": index,
            "tag": interaction.tag(),
            "request": render_request_diff(request, show_equal),
            "response": render_response_diff(response, show_equal),
        }),
        InteractionDiff::Inserted {
            index,
            interaction: only,
        }
        | InteractionDiff::Deleted {
            index,
            interaction: only,
        } => json!({
            "index": index,
            "tag": interaction.tag(),
            "interaction": render_interaction(only),
        }),
    }
}

fn render_request_diff(request: &RequestDiff, show_equal: bool) -> Value {
    json!({
        "tag": if request.is_equal() { Tag::Equal } else { Tag::Replace },
        "method": render_value_diff(&request.method),
        "path": render_value_diff(&request.path),
        "headers": render_header_diffs(&request.headers),
        "body": render_body_diff(&request.body, show_equal),
    })
}

fn render_response_diff(response: &ResponseDiff, show_equal: bool) -> Value {
    match response {
        ResponseDiff::Absent => json!({ "tag": Tag::Equal, "absent": true }),
        ResponseDiff::Compared {
            status_code,
            headers,
            body,
        } => json!({
            "tag": response.tag(),
            "status_code": render_value_diff(status_code),
            "headers": render_header_diffs(headers),
            "body": render_body_diff(body, show_equal),
        }),
        ResponseDiff::Inserted(only) | ResponseDiff::Deleted(only) => json!({
            "tag": response.tag(),
            "response": render_response(only),
        }),
    }
}

fn render_value_diff<T: Serialize>(value: &ValueDiff<T>) -> Value {
    match value.tag {
        Tag::Equal => json!({ "tag": Tag::Equal, "value": value.old }),
        tag => json!({ "tag": tag, "old": value.old, "new": value.new }),
    }
}

fn render_header_diffs(headers: &[HeaderDiff]) -> Value {
    headers
        .iter()
        .map(|header| match header.tag {
            Tag::Equal => json!({ "tag": header.tag, "name": header.name, "value": header.old }),
            Tag::Insert => json!({ "tag": header.tag, "name": header.name, "new": header.new }),
            Tag::Delete => json!({ "tag": header.tag, "name": header.name, "old": header.old }),
            Tag::Replace => json!({
                "tag": header.tag,
                "name": header.name,
                "old": header.old,
                "new": header.new,
            }),
        })
        .collect()
}

fn render_body_diff(body: &BodyDiff, show_equal: bool) -> Value {
    json!({
        "tag": if body.is_equal() { Tag::Equal } else { Tag::Replace },
        "edits": body
            .edits
            .iter()
            .map(|edit| render_line_edit(edit, show_equal))
            .collect::<Vec<_>>(),
    })
}

fn render_line_edit(edit: &LineEdit, show_equal: bool) -> Value {
    match edit.tag {
        Tag::Equal if show_equal => json!({ "tag": edit.tag, "lines": render_lines(&edit.old) }),
        Tag::Equal => json!({ "tag": edit.tag, "collapsed": edit.old.len() }),
        Tag::Insert => json!({ "tag": edit.tag, "new": render_lines(&edit.new) }),
        Tag::Delete => json!({ "tag": edit.tag, "old": render_lines(&edit.old) }),
        Tag::Replace => json!({
            "tag": edit.tag,
            "old": render_lines(&edit.old),
            "new": render_lines(&edit.new),
        }),
    }
}

fn render_lines(lines: &[Line]) -> Value {
    lines
        .iter()
        .map(|line| match line {
            Line::Text(text) => Value::String(text.clone()),
            Line::Masked => json!({ "masked": true }),
        })
        .collect()
}

fn render_group(group: &InteractionGroup) -> Value {
    json!({
        "name": group.name,
        "interactions": group.interactions.iter().map(render_interaction).collect::<Vec<_>>(),
    })
}

fn render_interaction(interaction: &InteractionData) -> Value {
    json!({
        "request": render_request(&interaction.request_data),
        "response": interaction.response_data.as_ref().map(render_response),
    })
}

fn render_request(request: &RequestData) -> Value {
    json!({
        "method": request.method,
        "path": request.path,
        "headers": render_headers(&request.headers),
        "body": render_body(&request.body),
    })
}

fn render_response(response: &ResponseData) -> Value {
    json!({
        "status_code": response.status_code,
        "headers": render_headers(&response.headers),
        "body": render_body(&response.body),
    })
}

fn render_headers(headers: &Headers) -> Value {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn render_body(body: &Body) -> Value {
    match body {
        Body::Text(text) => Value::String(text.clone()),
        Body::Json(value) => value.clone(),
        Body::Masked => json!({ "masked": true }),
    }
}
