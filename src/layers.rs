use crate::zeplin::Layer;

/// Collects every non-blank `content` string in the tree, depth first, with a
/// node's own text ahead of its children's.
pub fn flatten_layer_texts(layers: &[Layer]) -> Vec<String> {
    let mut texts = Vec::new();
    collect_texts(layers, &mut texts);
    texts
}

fn collect_texts(layers: &[Layer], out: &mut Vec<String>) {
    for layer in layers {
        if let Some(content) = layer.content.as_deref() {
            if !content.trim().is_empty() {
                out.push(content.to_string());
            }
        }
        if let Some(children) = layer.layers.as_deref() {
            collect_texts(children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeplin::ScreenVersion;
    use serde_json::json;

    fn text(content: &str) -> Layer {
        Layer {
            content: Some(content.to_string()),
            ..Layer::default()
        }
    }

    fn group(children: Vec<Layer>) -> Layer {
        Layer {
            layers: Some(children),
            ..Layer::default()
        }
    }

    #[test]
    fn tree_without_content_is_empty() {
        assert!(flatten_layer_texts(&[]).is_empty());
        assert!(flatten_layer_texts(&[Layer::default(), group(vec![])]).is_empty());
    }

    #[test]
    fn nested_content_keeps_document_order() {
        let layers = vec![text("A"), group(vec![text("B")])];
        assert_eq!(flatten_layer_texts(&layers), vec!["A", "B"]);
    }

    #[test]
    fn parent_text_precedes_children() {
        let mut parent = group(vec![text("child 1"), group(vec![text("grandchild")])]);
        parent.content = Some("parent".to_string());
        let layers = vec![parent, text("sibling")];

        assert_eq!(
            flatten_layer_texts(&layers),
            vec!["parent", "child 1", "grandchild", "sibling"]
        );
    }

    #[test]
    fn blank_content_is_skipped() {
        let layers = vec![text(""), text("   "), text("Total: $12")];
        assert_eq!(flatten_layer_texts(&layers), vec!["Total: $12"]);
    }

    #[test]
    fn flattens_decoded_screen_version() {
        let version: ScreenVersion = serde_json::from_value(json!({
            "id": "v1",
            "layers": [
                { "type": "text", "content": "A" },
                { "type": "group", "layers": [ { "type": "text", "content": "B" } ] }
            ]
        }))
        .unwrap();

        assert_eq!(flatten_layer_texts(&version.layers), vec!["A", "B"]);
    }
}
