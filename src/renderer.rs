//! Section rendering
//!
//! The renderer walks a segmented template body against the session state:
//! occurrence counts decide how often each section repeats, the variable store
//! supplies the placeholders for each occurrence and the switch registry
//! decides which switches appear at all.
//!
//! Every section occurrence is rendered into its own string, substituted with
//! the variables in scope for that occurrence and trimmed. Nested sections are
//! found by segmenting the body of their parent, one level at a time.

use std::borrow::Cow;

use crate::occurrence::OccurrenceTracker;
use crate::parser::{BlockKind, Segment, Segmenter};
use crate::switches::SwitchRegistry;
use crate::utils::replace_multiple_cow;
use crate::variables::{VarMap, VariableStore};

/// Renders template bodies against one session's state
pub struct Renderer<'a> {
    segmenter: &'a mut Segmenter,
    occurrences: &'a OccurrenceTracker,
    variables: &'a VariableStore,
    switches: &'a SwitchRegistry,
}

impl<'a> Renderer<'a> {
    pub fn new(
        segmenter: &'a mut Segmenter,
        occurrences: &'a OccurrenceTracker,
        variables: &'a VariableStore,
        switches: &'a SwitchRegistry,
    ) -> Self {
        Self {
            segmenter,
            occurrences,
            variables,
            switches,
        }
    }

    /// Render a complete template body
    ///
    /// Literal text at the top level is kept as is. Root variables are
    /// substituted last, over the whole output.
    pub fn render(&mut self, body: &str) -> String {
        let root_scope = VarMap::new();
        let segments = self.segmenter.segment(body);
        let mut output = String::with_capacity(body.len());

        for segment in segments.iter() {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Block {
                    kind: BlockKind::Section,
                    name,
                    body,
                } => {
                    let path = format!(".{}", name);
                    output.push_str(&self.render_section(&path, body, &root_scope));
                }
                Segment::Block {
                    kind: BlockKind::Switch,
                    name,
                    body,
                } => {
                    if self.switches.is_enabled(name) {
                        output.push_str(&self.render_switch("", body, &root_scope));
                    }
                }
            }
        }

        replace_multiple_cow(&output, self.variables.root()).into_owned()
    }

    /// Render every occurrence of the section at `path`
    ///
    /// `path` is rooted and qualified up to its parent, e.g. `.one{2}.two`.
    /// Returns an empty string for a section that was never assigned.
    pub fn render_section(&mut self, path: &str, body: &str, parent: &VarMap) -> String {
        let Some(count) = self.occurrences.count(path) else {
            return String::new();
        };
        log::trace!("rendering section {} x{}", path, count);

        let variables = self.variables;
        let segments = self.segmenter.segment(body);
        let mut output = String::new();

        for occurrence in 1..=count {
            let qualified = format!("{}{{{}}}", path, occurrence);

            let scope: Cow<'_, VarMap> = match variables.section_scope(&qualified) {
                Some(own) => {
                    let mut merged = parent.clone();
                    merged.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
                    Cow::Owned(merged)
                }
                None => Cow::Borrowed(parent),
            };

            let text = self.render_occurrence(&qualified, &segments, &scope);
            output.push_str(replace_multiple_cow(&text, scope.iter()).trim());
        }

        output
    }

    /// Render an enabled switch body once, in the occurrence that contains it
    fn render_switch(&mut self, qualified: &str, body: &str, scope: &VarMap) -> String {
        let segments = self.segmenter.segment(body);
        let text = self.render_occurrence(qualified, &segments, scope);
        replace_multiple_cow(&text, scope.iter()).trim().to_string()
    }

    fn render_occurrence(&mut self, qualified: &str, segments: &[Segment], scope: &VarMap) -> String {
        let mut text = String::new();

        for segment in segments {
            match segment {
                Segment::Literal(literal) => text.push_str(literal.trim()),
                Segment::Block {
                    kind: BlockKind::Section,
                    name,
                    body,
                } => {
                    let child = format!("{}.{}", qualified, name);
                    text.push_str(&self.render_section(&child, body, scope));
                }
                Segment::Block {
                    kind: BlockKind::Switch,
                    name,
                    body,
                } => {
                    if self.switches.is_enabled(name) {
                        text.push_str(&self.render_switch(qualified, body, scope));
                    }
                }
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct State {
        segmenter: Segmenter,
        occurrences: OccurrenceTracker,
        variables: VariableStore,
        switches: SwitchRegistry,
    }

    impl State {
        fn assign(&mut self, path: &str, vars: &[(&str, &str)]) {
            let qualified = self.occurrences.open_leaf(path);
            let pairs = vars.iter().map(|(k, v)| (k.to_string(), v.to_string()));
            self.variables.set_section_vars(&qualified, path, pairs);
        }

        fn render(&mut self, body: &str) -> String {
            Renderer::new(
                &mut self.segmenter,
                &self.occurrences,
                &self.variables,
                &self.switches,
            )
            .render(body)
        }
    }

    const NESTED: &str =
        "<!-- BEGIN one --><!-- BEGIN two --> {one.two.v} <!-- END two --><!-- END one -->";

    #[test]
    fn test_nested_occurrences_render_in_order() {
        let mut state = State::default();
        state.assign("one", &[]);
        state.assign("one.two", &[("v", "X")]);
        state.assign("one", &[]);
        state.assign("one.two", &[("v", "Y")]);

        assert_eq!(state.render(NESTED), "XY");
    }

    #[test]
    fn test_unassigned_section_renders_nothing() {
        let mut state = State::default();
        assert_eq!(state.render("a<!-- BEGIN row -->{row.x}<!-- END row -->b"), "ab");
    }

    #[test]
    fn test_root_literals_are_verbatim() {
        let mut state = State::default();
        state.assign("row", &[("x", "1")]);
        state.assign("row", &[("x", "2")]);
        let body = "<ul>\n<!-- BEGIN row -->\n  <li>{row.x}</li>\n<!-- END row -->\n</ul>\n";
        assert_eq!(state.render(body), "<ul>\n<li>1</li><li>2</li>\n</ul>\n");
    }

    #[test]
    fn test_variables_do_not_leak_between_occurrences() {
        let mut state = State::default();
        state.assign("row", &[("a", "first")]);
        state.assign("row", &[("b", "second")]);
        let body = "<!-- BEGIN row -->[{row.a}|{row.b}]<!-- END row -->";
        assert_eq!(state.render(body), "[first|{row.b}][{row.a}|second]");
    }

    #[test]
    fn test_child_sees_parent_variables() {
        let mut state = State::default();
        state.assign("user", &[("name", "Ada")]);
        state.assign("user.role", &[("title", "admin")]);
        let body = "<!-- BEGIN user -->{user.name}:<!-- BEGIN role -->{user.name}/{user.role.title}<!-- END role --><!-- END user -->";
        assert_eq!(state.render(body), "Ada:Ada/admin");
    }

    #[test]
    fn test_switches() {
        let mut state = State::default();
        let body = "a<!-- SWITCH admin -->[{who}]<!-- END admin -->b";
        assert_eq!(state.render(body), "ab");

        state.switches.enable("admin");
        state.variables.set_root_var("who", "root".to_string());
        assert_eq!(state.render(body), "a[root]b");
    }

    #[test]
    fn test_switch_inside_section_uses_occurrence_scope() {
        let mut state = State::default();
        state.assign("row", &[("x", "1")]);
        state.assign("row.cell", &[("y", "c")]);
        state.switches.enable("extra");
        let body = "<!-- BEGIN row -->{row.x}<!-- SWITCH extra -->+{row.x}<!-- BEGIN cell -->{row.cell.y}<!-- END cell --><!-- END extra --><!-- END row -->";
        assert_eq!(state.render(body), "1+1c");
    }

    #[test]
    fn test_switch_inside_repeated_section() {
        let mut state = State::default();
        state.assign("row", &[("x", "1")]);
        state.assign("row", &[("x", "2")]);
        let body = "<!-- BEGIN row -->{row.x}<!-- SWITCH s -->S{row.x}<!-- END s --><!-- END row -->";
        assert_eq!(state.render(body), "12");

        state.switches.enable("s");
        assert_eq!(state.render(body), "1S12S2");
    }

    #[test]
    fn test_section_inside_root_switch() {
        let mut state = State::default();
        state.assign("item", &[("n", "7")]);
        state.switches.enable("list");
        let body = "<!-- SWITCH list --><!-- BEGIN item -->#{item.n}<!-- END item --><!-- END list -->";
        assert_eq!(state.render(body), "#7");
    }

    #[test]
    fn test_root_variables_applied_after_sections() {
        let mut state = State::default();
        state.assign("row", &[("label", "{site}")]);
        state.variables.set_root_var("site", "Example".to_string());
        let body = "<!-- BEGIN row -->{row.label}<!-- END row --> {missing}";
        assert_eq!(state.render(body), "Example {missing}");
    }
}
