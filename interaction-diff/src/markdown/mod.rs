use crate::{
    data::{
        Body, Headers, InteractionData, InteractionGroup, InteractionLog, RequestData,
        ResponseData,
    },
    error::{Error, Result},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    ops::Range,
    path::Path,
};
use tracing::debug;

lazy_static! {
    static ref HEADER_REGEX: Regex = Regex::new(
        concat!(
            r"(?m)^(?P<header_key>[!#$%&'*+.^_`|~0-9A-Za-z\-]+):",
            r"[ \t]*(?P<header_value>[^\r\n]*?)[ \t]*\r?$",
        )
    )
    .unwrap();
    static ref GROUP_REGEX: Regex =
        Regex::new(r"(?m)^# (?P<group_name>[^\r\n]*?)[ \t]*\r?$").unwrap();
    // the optional "(12.5 ms)" suffix is timing metadata and isn't captured
    static ref INTERACTION_REGEX: Regex = Regex::new(
        concat!(
            r"(?m)^## Interaction (?P<interaction_number>[0-9]+): ",
            r"(?P<http_method>\S+) (?P<path>\S*)",
            r"(?:[ \t]+\([0-9]+(?:\.[0-9]+)?[ \t]*ms\))?[ \t]*\r?$",
        )
    )
    .unwrap();
    static ref SECTION_REGEX: Regex = Regex::new(
        "(?ms)^\\#\\#\\# (?P<title>[^\\r\\n]*)\\r?$.*?```\\s*(?P<content>.*?)\\s*```"
    )
    .unwrap();
    static ref FENCE_REGEX: Regex = Regex::new(r"(?ms)^```[^\r\n]*\r?$.*?^```").unwrap();
    static ref STATUS_CODE_REGEX: Regex = Regex::new(r"\((?P<status_code>[0-9]+)").unwrap();
}

enum HeadingKind<'a> {
    Group(&'a str),
    Interaction { method: &'a str, path: &'a str },
}

struct Heading<'a> {
    start: usize,
    end: usize,
    kind: HeadingKind<'a>,
}

/// Loads a recording from disk.
///
/// A blank file is an empty log. A non-blank file without a single group or
/// interaction heading is rejected, as it most likely isn't a recording.
pub fn load_log<P: AsRef<Path>>(filename: P) -> Result<InteractionLog> {
    let path = filename.as_ref();
    let file_contents = fs::read_to_string(path).map_err(Error::io(path))?;
    let log = parse_log(&file_contents)?;

    if log.groups.is_empty() && !file_contents.trim().is_empty() {
        return Err(Error::InvalidMarkdownFormat { path: path.into() });
    }

    debug!(
        path = %path.display(),
        groups = log.groups.len(),
        interactions = log.interaction_count(),
        "loaded recording"
    );

    Ok(log)
}

pub fn parse_log<S: AsRef<str>>(contents: S) -> Result<InteractionLog> {
    let contents = contents.as_ref();
    let fences = fenced_blocks(contents);
    let outside_fences = |start: usize| !fences.iter().any(|fence| fence.contains(&start));
    let mut headings = Vec::new();

    for captures in GROUP_REGEX.captures_iter(contents) {
        if let (Some(whole), Some(name)) = (captures.get(0), captures.name("group_name")) {
            if !outside_fences(whole.start()) {
                continue;
            }
            headings.push(Heading {
                start: whole.start(),
                end: whole.end(),
                kind: HeadingKind::Group(name.as_str()),
            });
        }
    }

    for captures in INTERACTION_REGEX.captures_iter(contents) {
        if let (Some(whole), Some(method), Some(path)) = (
            captures.get(0),
            captures.name("http_method"),
            captures.name("path"),
        ) {
            if !outside_fences(whole.start()) {
                continue;
            }
            headings.push(Heading {
                start: whole.start(),
                end: whole.end(),
                kind: HeadingKind::Interaction {
                    method: method.as_str(),
                    path: path.as_str(),
                },
            });
        }
    }

    headings.sort_by_key(|heading| heading.start);

    let mut log = InteractionLog::default();

    for (index, heading) in headings.iter().enumerate() {
        let part_end = headings
            .get(index + 1)
            .map_or(contents.len(), |next| next.start);

        match heading.kind {
            HeadingKind::Group(name) => log.groups.push(InteractionGroup {
                name: Some(name.into()),
                interactions: Vec::new(),
            }),
            HeadingKind::Interaction { method, path } => {
                let interaction =
                    parse_interaction(method, path, &contents[heading.end..part_end])?;

                if log.groups.is_empty() {
                    log.groups.push(InteractionGroup::default());
                }
                if let Some(group) = log.groups.last_mut() {
                    group.interactions.push(interaction);
                }
            }
        }
    }

    Ok(log)
}

/// Byte ranges of the fenced code blocks; heading-like lines inside them are
/// body content.
fn fenced_blocks(contents: &str) -> Vec<Range<usize>> {
    FENCE_REGEX
        .find_iter(contents)
        .map(|fence| fence.start()..fence.end())
        .collect()
}

fn parse_interaction(method: &str, path: &str, part: &str) -> Result<InteractionData> {
    let mut request_data = RequestData {
        method: method.into(),
        path: path.into(),
        ..RequestData::default()
    };
    let mut response_headers = Headers::new();
    let mut response = None;

    for captures in SECTION_REGEX.captures_iter(part) {
        let title = captures["title"].trim();
        let content = captures.name("content").map_or("", |m| m.as_str());

        if title.starts_with("Request headers") {
            request_data.headers = parse_headers(content);
        } else if title.starts_with("Request body") {
            request_data.body = content.into();
        } else if title.starts_with("Response headers") {
            response_headers = parse_headers(content);
        } else if title.starts_with("Response body") {
            response = Some((parse_status_code(title)?, content));
        }
        // anything else (e.g. timing sections) is dropped
    }

    Ok(InteractionData {
        request_data,
        response_data: response.map(|(status_code, body)| ResponseData {
            status_code,
            headers: response_headers,
            body: body.into(),
        }),
    })
}

fn parse_status_code(title: &str) -> Result<u16> {
    let captures = STATUS_CODE_REGEX
        .captures(title)
        .ok_or_else(|| Error::InvalidStatusCode(title.into()))?;
    let status_code = &captures["status_code"];

    status_code
        .parse()
        .map_err(|_| Error::InvalidStatusCode(status_code.into()))
}

fn parse_headers<T: AsRef<str>>(headers_part: T) -> Headers {
    let mut headers = Headers::new();

    for capture in HEADER_REGEX.captures_iter(headers_part.as_ref()) {
        headers.insert(
            String::from(capture["header_key"].trim()),
            String::from(capture["header_value"].trim()),
        );
    }

    headers
}

pub fn save_log<P: AsRef<Path>>(markdown_path: P, log: &InteractionLog) -> Result<()> {
    let path = markdown_path.as_ref();
    let file = File::create(path).map_err(Error::io(path))?;

    write_log(BufWriter::new(file), log).map_err(Error::io(path))
}

pub fn write_log<W: Write>(mut writer: W, log: &InteractionLog) -> io::Result<()> {
    let mut number = 0;

    for group in &log.groups {
        if let Some(name) = &group.name {
            write!(writer, "# {}\r\n\r\n", name)?;
        }

        for interaction in &group.interactions {
            write_interaction(&mut writer, number, interaction)?;
            number += 1;
        }
    }

    writer.flush()
}

fn write_interaction<W: Write>(
    writer: &mut W,
    number: usize,
    interaction: &InteractionData,
) -> io::Result<()> {
    let request_data = &interaction.request_data;

    write!(
        writer,
        "## Interaction {}: {} {}\r\n\r\n",
        number, request_data.method, request_data.path
    )?;
    write!(
        writer,
        "### Request headers recorded for playback:\r\n\r\n```\r\n"
    )?;
    for (key, value) in &request_data.headers {
        write!(writer, "{}: {}\r\n", key, value)?;
    }
    write!(writer, "```\r\n\r\n")?;
    write!(
        writer,
        "### Request body recorded for playback ({}):\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
        content_type(&request_data.headers),
        body_text(&request_data.body),
    )?;

    if let Some(response_data) = &interaction.response_data {
        write!(
            writer,
            "### Response headers recorded for playback:\r\n\r\n```\r\n"
        )?;
        for (key, value) in &response_data.headers {
            write!(writer, "{}: {}\r\n", key, value)?;
        }
        write!(writer, "```\r\n\r\n")?;
        write!(
            writer,
            "### Response body recorded for playback ({}: {}):\r\n\r\n```\r\n{}\r\n```\r\n\r\n",
            response_data.status_code,
            content_type(&response_data.headers),
            body_text(&response_data.body),
        )?;
    }

    Ok(())
}

fn content_type(headers: &Headers) -> &str {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .map_or("", |(_, value)| value.as_str())
}

fn body_text(body: &Body) -> String {
    match body {
        Body::Text(text) => text.clone(),
        Body::Json(value) => value.to_string(),
        Body::Masked => String::new(),
    }
}
