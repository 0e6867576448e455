use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;

/// Title and axis labels for a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

/// `"<prefix> of <x> vs <y>"`, with each axis titled by its column
pub fn build_layout(x_column: &str, y_column: &str, title_prefix: &str) -> LayoutSpec {
    LayoutSpec {
        title: format!("{} of {} vs {}", title_prefix, x_column, y_column),
        x_axis_title: x_column.to_string(),
        y_axis_title: y_column.to_string(),
    }
}

#[derive(Serialize)]
struct AxisTitle<'a> {
    title: &'a str,
}

// Renderers expect {title, xaxis: {title}, yaxis: {title}}
impl Serialize for LayoutSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LayoutSpec", 3)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("xaxis", &AxisTitle { title: &self.x_axis_title })?;
        state.serialize_field("yaxis", &AxisTitle { title: &self.y_axis_title })?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_layout() {
        let layout = build_layout("height", "weight", "Scatter Plot");
        assert_eq!(layout.title, "Scatter Plot of height vs weight");
        assert_eq!(layout.x_axis_title, "height");
        assert_eq!(layout.y_axis_title, "weight");
    }

    #[test]
    fn test_layout_json_shape() {
        let layout = build_layout("Gene", "Sample1", "Bar Chart");
        assert_eq!(
            serde_json::to_value(&layout).unwrap(),
            json!({
                "title": "Bar Chart of Gene vs Sample1",
                "xaxis": {"title": "Gene"},
                "yaxis": {"title": "Sample1"}
            })
        );
    }
}
