//! Standalone HTML page rendering

use minijinja::{Environment, context};

use crate::error::Result;
use crate::export::Renderer;
use crate::figure::SankeyFigure;

/// Default plotly.js bundle
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const TEMPLATE_NAME: &str = "sankey.html";

const SANKEY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <script src="{{ plotly_src|safe }}" charset="utf-8"></script>
</head>
<body>
  <div id="{{ div_id|safe }}" style="width:{{ width }}px;height:{{ height }}px;"></div>
  <script type="text/javascript">
    var figure = {{ figure_json|safe }};
    Plotly.newPlot("{{ div_id|safe }}", figure.data, figure.layout, {"responsive": true});
  </script>
</body>
</html>
"#;

/// Renders a figure as an interactive page that loads plotly.js.
///
/// The script source and element id are inserted verbatim; the title is
/// HTML-escaped.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    plotly_src: String,
    div_id: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            plotly_src: PLOTLY_CDN.to_string(),
            div_id: "dietflow-sankey".to_string(),
        }
    }
}

impl HtmlRenderer {
    /// Load plotly.js from a different location
    pub fn with_plotly_src(mut self, src: impl Into<String>) -> Self {
        self.plotly_src = src.into();
        self
    }

    /// Embed the figure as a script literal; `<` is escaped so no label can
    /// terminate the surrounding script element.
    fn figure_literal(figure: &SankeyFigure) -> Result<String> {
        Ok(serde_json::to_string(figure)?.replace('<', "\\u003c"))
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, figure: &SankeyFigure) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, SANKEY_TEMPLATE)?;
        let template = env.get_template(TEMPLATE_NAME)?;

        let page = template.render(context! {
            title => &figure.layout.title.text,
            plotly_src => &self.plotly_src,
            div_id => &self.div_id,
            width => figure.layout.width,
            height => figure.layout.height,
            figure_json => Self::figure_literal(figure)?,
        })?;
        Ok(page)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
