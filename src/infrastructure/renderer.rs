//! List-item template renderer.
//!
//! Turns a flat-navigation data record into one menu item element, the way
//! the navigation drawer template lays it out.

use async_trait::async_trait;
use tracing::trace;

use crate::domain::{DataRecord, Markup, ToggleState};
use crate::infrastructure::traits::{RenderError, Renderer, LIST_ITEM_CLASS};

/// Renders exactly one template name; anything else is a render failure.
#[derive(Debug, Clone)]
pub struct ListItemRenderer {
    template: String,
}

impl ListItemRenderer {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    fn render_item(&self, data: &DataRecord) -> Result<Markup, RenderError> {
        let key = data
            .text("key")
            .ok_or_else(|| RenderError::new("record has no 'key'"))?;

        let mut item = match data.text("action") {
            Some(url) => Markup::element("a").with_attr("href", url),
            None => Markup::element("div"),
        }
        .with_class(LIST_ITEM_CLASS)
        .with_class("list-group-item-action")
        .with_attr("data-key", key);

        if let Some(parent) = data.text("parent") {
            item = item.with_attr("data-parent-key", parent);
        }
        if let Some(past) = data.flag("past") {
            item = item.with_attr("data-past", past.to_string());
        }
        let hidden = data.flag("hidden").unwrap_or(false);
        item = item.with_attr("data-hidden", if hidden { "1" } else { "0" });
        if let Some(indent) = data.int("get_indent") {
            item = item
                .with_attr("data-indent", indent.to_string())
                .with_class(&format!("ml-{}", indent));
        }
        if data.flag("header").unwrap_or(false) {
            item = item
                .with_attr("data-header", "true")
                .with_class("list-group-item-header");
        }
        if data.flag("isexpandable").unwrap_or(false) {
            let state = ToggleState::from_collapsed(data.flag("collapse").unwrap_or(false));
            item = item
                .with_attr("data-isexpandable", "1")
                .with_attr("data-collapse", state.collapse_attr())
                .with_child(
                    Markup::element("i")
                        .with_class("fa")
                        .with_class(state.caret_class()),
                );
            if data.flag("forceopen").unwrap_or(false) {
                item = item.with_attr("data-forceopen", "1");
            }
        }
        for icon in data.list("icon") {
            let mut img = Markup::element("i").with_class("icon");
            if let Some(pix) = icon.text("pix") {
                img = img.with_attr("data-pix", pix);
            }
            if let Some(component) = icon.text("component") {
                img = img.with_attr("data-component", component);
            }
            if let Some(alt) = icon.text("alt") {
                img = img.with_attr("aria-label", alt);
            }
            item = item.with_child(img);
        }
        if let Some(text) = data.text("text") {
            item = item.with_text(text);
        }
        Ok(item)
    }
}

#[async_trait(?Send)]
impl Renderer for ListItemRenderer {
    async fn render(&self, template: &str, data: &DataRecord) -> Result<Markup, RenderError> {
        if template != self.template {
            return Err(RenderError::new(format!("unknown template: {}", template)));
        }
        trace!(key = data.key(), "rendering list item");
        self.render_item(data)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::domain::{CourseEntry, GroupLabel, Icon, TermHeader};

    const TEMPLATE: &str = "local_boostnavigation/mycoursesoveride";

    fn render(record: &DataRecord) -> Markup {
        block_on(ListItemRenderer::new(TEMPLATE).render(TEMPLATE, record)).unwrap()
    }

    #[test]
    fn given_current_header_when_rendered_then_flagged_not_past() {
        let markup = render(&TermHeader::new("Fall 2024", false).to_record("mycourses"));

        assert_eq!(markup.tag, "div");
        assert_eq!(markup.attrs["data-key"], "Fall 2024");
        assert_eq!(markup.attrs["data-past"], "false");
        assert_eq!(markup.attrs["data-hidden"], "0");
        assert_eq!(markup.attrs["data-header"], "true");
        assert_eq!(markup.attrs["data-parent-key"], "mycourses");
        assert!(markup.classes.contains(LIST_ITEM_CLASS));
    }

    #[test]
    fn given_entry_with_url_when_rendered_then_link() {
        let url = "/course/view.php?id=1";
        let entry = CourseEntry::new("c1", "Algebra", "Fall 2024").with_url(url);
        let markup = render(&entry.to_record("mycourses"));

        assert_eq!(markup.tag, "a");
        assert_eq!(markup.attrs["href"], url);
        assert_eq!(markup.text.as_deref(), Some("Algebra"));
    }

    #[test]
    fn given_past_label_when_rendered_then_collapsed_caret_and_icon() {
        let icon = Icon {
            pix: "i/moremenu".into(),
            component: "moodle".into(),
            alt: String::new(),
        };
        let label = GroupLabel::past("mycoursespast", "Past courses", icon);
        let markup = render(&label.to_record("mycourses"));

        assert_eq!(markup.attrs["data-collapse"], "1");
        assert_eq!(markup.attrs["data-forceopen"], "1");
        assert!(!markup.attrs.contains_key("data-past"));
        assert!(markup
            .children
            .iter()
            .any(|c| c.classes.contains("fa-caret-right")));
        assert!(markup
            .children
            .iter()
            .any(|c| c.attrs.get("data-pix").map(String::as_str) == Some("i/moremenu")));
    }

    #[test]
    fn given_unknown_template_when_rendering_then_error() {
        let renderer = ListItemRenderer::new(TEMPLATE);
        let record = DataRecord::new().with("key", "x");
        let result = block_on(renderer.render("core/other", &record));
        assert!(result.is_err());
    }

    #[test]
    fn given_record_without_key_when_rendering_then_error() {
        let renderer = ListItemRenderer::new(TEMPLATE);
        let result = block_on(renderer.render(TEMPLATE, &DataRecord::new()));
        assert_eq!(result, Err(RenderError::new("record has no 'key'")));
    }
}
