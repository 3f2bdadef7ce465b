use irgraph_core::subgraph::{NodeRecord, Relationship, Subgraph};

fn node(uri: &str, depth: u32) -> NodeRecord {
    NodeRecord {
        uri: uri.to_string(),
        labels: vec![format!("label of {}", uri)],
        comments: Vec::new(),
        depth,
    }
}

fn sample() -> Subgraph {
    let mut sub = Subgraph::new();
    sub.insert_node(node("urn:seed", 0));
    sub.insert_node(node("urn:a", 1));
    sub.insert_node(node("urn:b", 1));
    sub.insert_relationship(Relationship::new("urn:seed", "urn:a", "r"));
    sub.insert_relationship(Relationship::new("urn:b", "urn:seed", "r"));
    sub
}

#[test]
fn test_merge_with_itself_is_identity() {
    let s = sample();
    let mut merged = s.clone();
    let stats = merged.merge(s.clone());

    assert_eq!(merged, s);
    assert_eq!(stats.nodes_added, 0);
    assert_eq!(stats.relationships_added, 0);
}

#[test]
fn test_merge_keeps_first_seen_depth() {
    let mut base = sample();
    let mut later = Subgraph::new();
    later.insert_node(node("urn:a", 5));
    later.insert_node(node("urn:c", 2));

    let stats = base.merge(later);

    assert_eq!(base.node("urn:a").unwrap().depth, 1);
    assert_eq!(base.node("urn:c").unwrap().depth, 2);
    assert_eq!(stats.nodes_added, 1);
}

#[test]
fn test_relationship_triple_stored_once() {
    let mut base = sample();
    let mut addition = Subgraph::new();
    addition.insert_relationship(Relationship::new("urn:seed", "urn:a", "r"));
    addition.insert_relationship(Relationship::new("urn:seed", "urn:a", "other"));
    addition.insert_relationship(Relationship::new("urn:a", "urn:seed", "r"));

    base.merge(addition.clone());
    base.merge(addition);

    let count = |s: &str, t: &str, ty: &str| {
        base.relationships()
            .iter()
            .filter(|r| r.source == s && r.target == t && r.rel_type == ty)
            .count()
    };
    assert_eq!(count("urn:seed", "urn:a", "r"), 1);
    assert_eq!(count("urn:seed", "urn:a", "other"), 1);
    assert_eq!(count("urn:a", "urn:seed", "r"), 1);
    assert_eq!(base.relationship_count(), 4);
}

#[test]
fn test_merge_is_batching_independent() {
    let mut x = Subgraph::new();
    x.insert_node(node("urn:x", 2));
    x.insert_relationship(Relationship::new("urn:a", "urn:x", "r"));
    let mut y = Subgraph::new();
    y.insert_node(node("urn:y", 2));
    y.insert_node(node("urn:x", 3));
    y.insert_relationship(Relationship::new("urn:b", "urn:y", "r"));

    let mut one_by_one = sample();
    one_by_one.merge(x.clone());
    one_by_one.merge(y.clone());

    let together = sample().merged(&x.merged(&y));

    assert_eq!(one_by_one.nodes(), together.nodes());
    assert_eq!(one_by_one.relationship_count(), together.relationship_count());
    for rel in together.relationships() {
        assert!(one_by_one.contains_relationship(rel));
    }
}

#[test]
fn test_merged_leaves_base_untouched() {
    let base = sample();
    let mut addition = Subgraph::new();
    addition.insert_node(node("urn:new", 2));

    let grown = base.merged(&addition);

    assert!(!base.contains_node("urn:new"));
    assert!(grown.contains_node("urn:new"));
}

#[test]
fn test_leaf_nodes_follow_max_depth() {
    let mut sub = sample();
    assert_eq!(sub.leaf_nodes(), vec!["urn:a".to_string(), "urn:b".to_string()]);

    sub.insert_node(node("urn:deep", 2));
    assert_eq!(sub.leaf_nodes(), vec!["urn:deep".to_string()]);
}

#[test]
fn test_wire_format() {
    let sub = sample();
    let json = serde_json::to_value(&sub).unwrap();

    assert_eq!(json["nodes"]["urn:a"]["depth"], 1);
    assert_eq!(json["nodes"]["urn:a"]["uri"], "urn:a");
    assert_eq!(json["relationships"][0]["type"], "r");
    assert_eq!(json["relationships"][0]["source"], "urn:seed");
    assert!(json.get("relationship_keys").is_none());

    let view = serde_json::to_value(sub.view()).unwrap();
    assert_eq!(view["leaf_nodes"], serde_json::json!(["urn:a", "urn:b"]));
}

#[test]
fn test_deserialize_drops_duplicate_relationships() {
    let json = r#"{
        "nodes": {"urn:a": {"uri": "urn:a", "labels": ["A"], "comments": [], "depth": 0}},
        "relationships": [
            {"source": "urn:a", "target": "urn:a", "type": "self"},
            {"source": "urn:a", "target": "urn:a", "type": "self"}
        ]
    }"#;
    let sub: Subgraph = serde_json::from_str(json).unwrap();

    assert_eq!(sub.relationship_count(), 1);
    assert!(sub.contains_relationship(&Relationship::new("urn:a", "urn:a", "self")));
}
