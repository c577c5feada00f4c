use crate::node::{Action, Element, EventKind, Node};
use crate::sanitize::{PollProps, SanitizedNode};
use crate::surface::RenderScope;

/// Shown next to every option in static renderings. Votes are not
/// persisted, so there is no real tally to show.
pub const PLACEHOLDER_TALLY: &str = "123 votes (10%)";

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &PollProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let poll = scope.next_poll();
    let selected = scope.live().and_then(|live| live.polls.get(&poll)).copied();

    let options = props.options.iter().enumerate().map(|(option, text)| {
        let class = if selected == Some(option) {
            "poll-option poll-option-selected"
        } else {
            "poll-option"
        };
        Element::new("li")
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .attr("className", class)
                    .on(
                        EventKind::Click,
                        Action::SelectPollOption { poll, option },
                    )
                    .child(text.as_str()),
            )
            .into()
    });
    Element::new("div")
        .attr("className", "poll")
        .child(Element::new("ul").children(options))
        .into()
}

pub(crate) fn email(
    _scope: &mut RenderScope<'_>,
    props: &PollProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let rows = props.options.iter().map(|option| {
        Element::new("tr")
            .child(
                Element::new("td")
                    .attr("style", "padding:8px 12px;border:1px solid #e5e7eb")
                    .child(option.as_str()),
            )
            .child(
                Element::new("td")
                    .attr(
                        "style",
                        "padding:8px 12px;border:1px solid #e5e7eb;color:#6b7280;text-align:right",
                    )
                    .child(PLACEHOLDER_TALLY),
            )
            .into()
    });
    Element::new("table")
        .attr("role", "presentation")
        .attr("width", "100%")
        .attr("style", "border-collapse:collapse")
        .child(Element::new("tbody").children(rows))
        .into()
}
