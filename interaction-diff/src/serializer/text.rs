use crate::{
    data::{Body, Headers, InteractionData, Line, ResponseData},
    diff::{BodyDiff, DiffReport, GroupDiff, HeaderDiff, InteractionDiff, ResponseDiff, ValueDiff},
    line_diff::Tag,
};
use std::{fmt::Display, io, io::Write};

const INDENT: &str = "  ";

fn marker(tag: Tag) -> char {
    match tag {
        Tag::Equal => '=',
        Tag::Insert => '+',
        Tag::Delete => '-',
        Tag::Replace => '~',
    }
}

fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::Equal => "equal",
        Tag::Insert => "only in new",
        Tag::Delete => "only in old",
        Tag::Replace => "changed",
    }
}

pub(super) fn render<W: Write>(
    report: &DiffReport,
    show_equal: bool,
    writer: &mut W,
) -> io::Result<()> {
    for group in &report.groups {
        render_group_diff(writer, group, show_equal)?;
    }

    let summary = report.summary();
    writeln!(
        writer,
        "summary: {} equal, {} inserted, {} deleted, {} replaced",
        summary.equal, summary.inserted, summary.deleted, summary.replaced
    )
}

fn render_group_diff<W: Write>(
    writer: &mut W,
    group: &GroupDiff,
    show_equal: bool,
) -> io::Result<()> {
    match group {
        GroupDiff::Compared {
            index,
            name,
            interactions,
        } => {
            let label = name.new.as_deref().or(name.old.as_deref()).unwrap_or("");
            writeln!(
                writer,
                "{} group {} {:?}: {}",
                marker(group.tag()),
                index,
                label,
                tag_name(group.tag())
            )?;
            if !name.tag.is_equal() {
                writeln!(writer, "{}~ name: {:?} -> {:?}", INDENT, name.old, name.new)?;
            }
            for interaction in interactions {
                render_interaction_diff(writer, interaction, show_equal)?;
            }
        }
        GroupDiff::Inserted { index, group: only } | GroupDiff::Deleted { index, group: only } => {
            writeln!(
                writer,
                "{} group {} {:?}: {}, {} interactions",
                marker(group.tag()),
                index,
                only.name.as_deref().unwrap_or(""),
                tag_name(group.tag()),
                only.interactions.len()
            )?;
            for (index, interaction) in only.interactions.iter().enumerate() {
                render_whole_interaction(writer, group.tag(), index, interaction)?;
            }
        }
    }

    Ok(())
}

fn render_whole_interaction<W: Write>(
    writer: &mut W,
    tag: Tag,
    index: usize,
    interaction: &InteractionData,
) -> io::Result<()> {
    let request = &interaction.request_data;
    writeln!(
        writer,
        "{}{} interaction {}: {} {}: {}",
        INDENT,
        marker(tag),
        index,
        request.method,
        request.path,
        tag_name(tag)
    )?;

    let depth = 2;
    render_whole_headers(writer, depth, tag, "request headers", &request.headers)?;
    render_whole_body(writer, depth, tag, "request body", &request.body)?;

    match &interaction.response_data {
        Some(response) => render_whole_response(writer, depth, tag, response),
        None => writeln!(writer, "{}{} response: none", INDENT.repeat(depth), marker(tag)),
    }
}

fn render_whole_response<W: Write>(
    writer: &mut W,
    depth: usize,
    tag: Tag,
    response: &ResponseData,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}{} response {}: {}",
        INDENT.repeat(depth),
        marker(tag),
        response.status_code,
        tag_name(tag)
    )?;
    render_whole_headers(writer, depth, tag, "response headers", &response.headers)?;
    render_whole_body(writer, depth, tag, "response body", &response.body)
}

fn render_whole_headers<W: Write>(
    writer: &mut W,
    depth: usize,
    tag: Tag,
    label: &str,
    headers: &Headers,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    writeln!(writer, "{}{}:", indent, label)?;

    for (name, value) in headers {
        writeln!(writer, "{}{}{} {}: {}", indent, INDENT, marker(tag), name, value)?;
    }

    Ok(())
}

fn render_whole_body<W: Write>(
    writer: &mut W,
    depth: usize,
    tag: Tag,
    label: &str,
    body: &Body,
) -> io::Result<()> {
    writeln!(writer, "{}{}:", INDENT.repeat(depth), label)?;
    render_lines(writer, &INDENT.repeat(depth + 1), marker(tag), &body.lines())
}

fn render_interaction_diff<W: Write>(
    writer: &mut W,
    interaction: &InteractionDiff,
    show_equal: bool,
) -> io::Result<()> {
    let (index, request, response) = match interaction {
        InteractionDiff::Compared {
            index,
            request,
            response,
        } => (index, request, response),
        InteractionDiff::Inserted {
            index,
            interaction: only,
        }
        | InteractionDiff::Deleted {
            index,
            interaction: only,
        } => return render_whole_interaction(writer, interaction.tag(), *index, only),
    };

    writeln!(
        writer,
        "{}{} interaction {}: {} {}: {}",
        INDENT,
        marker(interaction.tag()),
        index,
        request.method.new,
        request.path.new,
        tag_name(interaction.tag())
    )?;

    let depth = 2;
    render_value_diff(writer, depth, "method", &request.method)?;
    render_value_diff(writer, depth, "path", &request.path)?;
    render_header_diffs(writer, depth, "request headers", &request.headers)?;
    render_body_diff(writer, depth, "request body", &request.body, show_equal)?;

    match response {
        ResponseDiff::Absent => writeln!(writer, "{}= response: none", INDENT.repeat(depth)),
        ResponseDiff::Inserted(only) | ResponseDiff::Deleted(only) => {
            render_whole_response(writer, depth, response.tag(), only)
        }
        ResponseDiff::Compared {
            status_code,
            headers,
            body,
        } => {
            render_value_diff(writer, depth, "status", status_code)?;
            render_header_diffs(writer, depth, "response headers", headers)?;
            render_body_diff(writer, depth, "response body", body, show_equal)
        }
    }
}

fn render_value_diff<W: Write, T: Display>(
    writer: &mut W,
    depth: usize,
    label: &str,
    value: &ValueDiff<T>,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);

    if value.tag.is_equal() {
        writeln!(writer, "{}= {}: {}", indent, label, value.old)
    } else {
        writeln!(writer, "{}~ {}: {} -> {}", indent, label, value.old, value.new)
    }
}

fn render_header_diffs<W: Write>(
    writer: &mut W,
    depth: usize,
    label: &str,
    headers: &[HeaderDiff],
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    writeln!(writer, "{}{}:", indent, label)?;

    for header in headers {
        let old = header.old.as_deref().unwrap_or("");
        let new = header.new.as_deref().unwrap_or("");

        match header.tag {
            Tag::Equal | Tag::Delete => writeln!(
                writer,
                "{}{}{} {}: {}",
                indent,
                INDENT,
                marker(header.tag),
                header.name,
                old
            )?,
            Tag::Insert => writeln!(
                writer,
                "{}{}{} {}: {}",
                indent,
                INDENT,
                marker(header.tag),
                header.name,
                new
            )?,
            Tag::Replace => writeln!(
                writer,
                "{}{}~ {}: {} -> {}",
                indent, INDENT, header.name, old, new
            )?,
        }
    }

    Ok(())
}

fn render_body_diff<W: Write>(
    writer: &mut W,
    depth: usize,
    label: &str,
    body: &BodyDiff,
    show_equal: bool,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth + 1);
    writeln!(writer, "{}{}:", INDENT.repeat(depth), label)?;

    for edit in &body.edits {
        match edit.tag {
            Tag::Equal if !show_equal => {
                writeln!(writer, "{}... {} equal lines", indent, edit.old.len())?
            }
            Tag::Equal => render_lines(writer, &indent, '=', &edit.old)?,
            Tag::Insert => render_lines(writer, &indent, '+', &edit.new)?,
            Tag::Delete => render_lines(writer, &indent, '-', &edit.old)?,
            Tag::Replace => {
                render_lines(writer, &indent, '-', &edit.old)?;
                render_lines(writer, &indent, '+', &edit.new)?;
            }
        }
    }

    Ok(())
}

fn render_lines<W: Write>(
    writer: &mut W,
    indent: &str,
    marker: char,
    lines: &[Line],
) -> io::Result<()> {
    for line in lines {
        match line {
            Line::Text(text) => writeln!(writer, "{}{} {}", indent, marker, text)?,
            Line::Masked => writeln!(writer, "{}{} <masked body>", indent, marker)?,
        }
    }

    Ok(())
}
