//! HTML fragments rendered for the admin pages.
//!
//! Template names end in `.html` so tera autoescapes every `{{ }}` value.

use std::sync::LazyLock;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::CoreError;

/// Change-list badge for a locked record.
const BADGE: &str = r##"<a href="#" id="{{ entry_id }}" class="lock-status locked" title="Locked By: {{ full_name }}"><img src="{{ icon_url }}" title="{{ tooltip }}" /> {{ username }}</a>{% for other in other_lockers %}<div>{{ other }}</div>{% endfor %}"##;

/// Stylesheet and script tags for the admin page head, one per line.
const MEDIA: &str = r#"{% for href in css_all %}<link href="{{ href }}" type="text/css" media="all" rel="stylesheet" />
{% endfor %}{% for src in js %}<script type="text/javascript" src="{{ src }}"></script>
{% endfor %}"#;

static TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![("badge.html", BADGE), ("media.html", MEDIA)])
        .expect("valid admin templates");
    tera
});

/// Render a named template with a serializable context.
pub(crate) fn render(name: &str, context: &impl Serialize) -> Result<String, CoreError> {
    let context = Context::from_serialize(context)
        .map_err(|e| CoreError::Internal(format!("template context for {name}: {e}")))?;
    TEMPLATES
        .render(name, &context)
        .map_err(|e| CoreError::Internal(format!("rendering {name}: {e}")))
}
