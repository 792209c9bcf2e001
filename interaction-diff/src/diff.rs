use crate::{
    data::{
        Body, Headers, InteractionData, InteractionGroup, InteractionLog, Line, RequestData,
        ResponseData,
    },
    line_diff::{diff_sequences, Tag},
};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub groups: Vec<GroupDiff>,
}

/// Interaction level counts over the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    pub equal: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub replaced: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupDiff {
    Compared {
        index: usize,
        name: ValueDiff<Option<String>>,
        interactions: Vec<InteractionDiff>,
    },
    /// A group only the new log has.
    Inserted { index: usize, group: InteractionGroup },
    /// A group only the old log has.
    Deleted { index: usize, group: InteractionGroup },
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionDiff {
    Compared {
        index: usize,
        request: RequestDiff,
        response: ResponseDiff,
    },
    Inserted {
        index: usize,
        interaction: InteractionData,
    },
    Deleted {
        index: usize,
        interaction: InteractionData,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDiff {
    pub method: ValueDiff<String>,
    pub path: ValueDiff<String>,
    pub headers: Vec<HeaderDiff>,
    pub body: BodyDiff,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseDiff {
    /// Neither side captured a response.
    Absent,
    Compared {
        status_code: ValueDiff<u16>,
        headers: Vec<HeaderDiff>,
        body: BodyDiff,
    },
    Inserted(ResponseData),
    Deleted(ResponseData),
}

/// An exactly compared scalar field: `Equal` or `Replace`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDiff<T> {
    pub tag: Tag,
    pub old: T,
    pub new: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDiff {
    pub tag: Tag,
    pub name: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyDiff {
    pub edits: Vec<LineEdit>,
}

/// A run of body lines sharing one tag. For `Equal` runs `old == new`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdit {
    pub tag: Tag,
    pub old: Vec<Line>,
    pub new: Vec<Line>,
}

fn combined_tag(equal: bool) -> Tag {
    if equal {
        Tag::Equal
    } else {
        Tag::Replace
    }
}

impl DiffReport {
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();

        for group in &self.groups {
            match group {
                GroupDiff::Compared { interactions, .. } => {
                    for interaction in interactions {
                        match interaction.tag() {
                            Tag::Equal => summary.equal += 1,
                            Tag::Insert => summary.inserted += 1,
                            Tag::Delete => summary.deleted += 1,
                            Tag::Replace => summary.replaced += 1,
                        }
                    }
                }
                GroupDiff::Inserted { group, .. } => summary.inserted += group.interactions.len(),
                GroupDiff::Deleted { group, .. } => summary.deleted += group.interactions.len(),
            }
        }

        summary
    }

    pub fn has_differences(&self) -> bool {
        self.groups.iter().any(|group| !group.tag().is_equal())
    }
}

impl GroupDiff {
    pub fn tag(&self) -> Tag {
        match self {
            GroupDiff::Compared {
                name, interactions, ..
            } => combined_tag(
                name.tag.is_equal() && interactions.iter().all(|i| i.tag().is_equal()),
            ),
            GroupDiff::Inserted { .. } => Tag::Insert,
            GroupDiff::Deleted { .. } => Tag::Delete,
        }
    }
}

impl InteractionDiff {
    pub fn tag(&self) -> Tag {
        match self {
            InteractionDiff::Compared {
                request, response, ..
            } => combined_tag(request.is_equal() && response.tag().is_equal()),
            InteractionDiff::Inserted { .. } => Tag::Insert,
            InteractionDiff::Deleted { .. } => Tag::Delete,
        }
    }
}

impl RequestDiff {
    pub fn is_equal(&self) -> bool {
        self.method.tag.is_equal()
            && self.path.tag.is_equal()
            && self.headers.iter().all(|h| h.tag.is_equal())
            && self.body.is_equal()
    }
}

impl ResponseDiff {
    pub fn tag(&self) -> Tag {
        match self {
            ResponseDiff::Absent => Tag::Equal,
            ResponseDiff::Compared {
                status_code,
                headers,
                body,
            } => combined_tag(
                status_code.tag.is_equal()
                    && headers.iter().all(|h| h.tag.is_equal())
                    && body.is_equal(),
            ),
            ResponseDiff::Inserted(_) => Tag::Insert,
            ResponseDiff::Deleted(_) => Tag::Delete,
        }
    }
}

impl BodyDiff {
    pub fn is_equal(&self) -> bool {
        self.edits.iter().all(|edit| edit.tag.is_equal())
    }
}

impl<T: PartialEq> ValueDiff<T> {
    fn compare(old: T, new: T) -> Self {
        Self {
            tag: combined_tag(old == new),
            old,
            new,
        }
    }
}

/// Pairs `old[i]` with `new[i]`; whatever is left over in the longer slice is
/// reported on its own, without trying to match it against anything.
fn pair_by_position<T, D>(
    old: &[T],
    new: &[T],
    compare: impl Fn(usize, &T, &T) -> D,
    inserted: impl Fn(usize, &T) -> D,
    deleted: impl Fn(usize, &T) -> D,
) -> Vec<D> {
    let paired = old.len().min(new.len());

    old.iter()
        .zip(new)
        .enumerate()
        .map(|(index, (old, new))| compare(index, old, new))
        .chain(
            old.iter()
                .enumerate()
                .skip(paired)
                .map(|(index, old)| deleted(index, old)),
        )
        .chain(
            new.iter()
                .enumerate()
                .skip(paired)
                .map(|(index, new)| inserted(index, new)),
        )
        .collect()
}

pub fn diff_logs(old: &InteractionLog, new: &InteractionLog) -> DiffReport {
    let report = DiffReport {
        groups: pair_by_position(
            &old.groups,
            &new.groups,
            diff_groups,
            |index, group| GroupDiff::Inserted {
                index,
                group: group.clone(),
            },
            |index, group| GroupDiff::Deleted {
                index,
                group: group.clone(),
            },
        ),
    };

    let summary = report.summary();
    debug!(
        equal = summary.equal,
        inserted = summary.inserted,
        deleted = summary.deleted,
        replaced = summary.replaced,
        "computed diff"
    );

    report
}

fn diff_groups(index: usize, old: &InteractionGroup, new: &InteractionGroup) -> GroupDiff {
    GroupDiff::Compared {
        index,
        name: ValueDiff::compare(old.name.clone(), new.name.clone()),
        interactions: pair_by_position(
            &old.interactions,
            &new.interactions,
            diff_interactions,
            |index, interaction| InteractionDiff::Inserted {
                index,
                interaction: interaction.clone(),
            },
            |index, interaction| InteractionDiff::Deleted {
                index,
                interaction: interaction.clone(),
            },
        ),
    }
}

pub fn diff_interactions(
    index: usize,
    old: &InteractionData,
    new: &InteractionData,
) -> InteractionDiff {
    InteractionDiff::Compared {
        index,
        request: diff_requests(&old.request_data, &new.request_data),
        response: diff_responses(old.response_data.as_ref(), new.response_data.as_ref()),
    }
}

fn diff_requests(old: &RequestData, new: &RequestData) -> RequestDiff {
    RequestDiff {
        method: ValueDiff::compare(old.method.clone(), new.method.clone()),
        path: ValueDiff::compare(old.path.clone(), new.path.clone()),
        headers: diff_headers(&old.headers, &new.headers),
        body: diff_bodies(&old.body, &new.body),
    }
}

fn diff_responses(old: Option<&ResponseData>, new: Option<&ResponseData>) -> ResponseDiff {
    match (old, new) {
        (None, None) => ResponseDiff::Absent,
        (Some(old), None) => ResponseDiff::Deleted(old.clone()),
        (None, Some(new)) => ResponseDiff::Inserted(new.clone()),
        (Some(old), Some(new)) => ResponseDiff::Compared {
            status_code: ValueDiff::compare(old.status_code, new.status_code),
            headers: diff_headers(&old.headers, &new.headers),
            body: diff_bodies(&old.body, &new.body),
        },
    }
}

/// One record per header name present on either side, in name order.
pub fn diff_headers(old: &Headers, new: &Headers) -> Vec<HeaderDiff> {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    names
        .into_iter()
        .filter_map(|name| {
            let (old, new) = (old.get(name), new.get(name));
            let tag = match (old, new) {
                (Some(old), Some(new)) => combined_tag(old == new),
                (Some(_), None) => Tag::Delete,
                (None, Some(_)) => Tag::Insert,
                (None, None) => return None,
            };

            Some(HeaderDiff {
                tag,
                name: name.clone(),
                old: old.cloned(),
                new: new.cloned(),
            })
        })
        .collect()
}

pub fn diff_bodies(old: &Body, new: &Body) -> BodyDiff {
    let (old_lines, new_lines) = (old.lines(), new.lines());

    BodyDiff {
        edits: diff_sequences(&old_lines, &new_lines)
            .into_iter()
            .map(|opcode| LineEdit {
                tag: opcode.tag,
                old: old_lines[opcode.a_range].to_vec(),
                new: new_lines[opcode.b_range].to_vec(),
            })
            .collect(),
    }
}
