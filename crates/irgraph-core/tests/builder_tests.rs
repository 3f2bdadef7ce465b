use irgraph_core::graph::{GraphError, GraphQuery, GraphStore, MemoryGraph, Row};
use irgraph_core::subgraph::{Relationship, Subgraph, SubgraphBuilder};

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// "Observable" with two labeled neighbors plus noise that must be ignored.
fn observable_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    graph
        .add_node(
            "urn:uco:Observable",
            labels(&["Observable"]),
            labels(&["Something that can be observed"]),
        )
        .add_labeled("urn:uco:File", "File")
        .add_labeled("urn:uco:IPAddress", "IP Address")
        .add_labeled("bnode://b0", "restriction")
        .add_node("urn:uco:Unlabeled", Vec::new(), Vec::new())
        .add_edge("urn:uco:File", "urn:uco:Observable", "rdfs__subClassOf")
        .add_edge("urn:uco:Observable", "urn:uco:IPAddress", "uco__hasFacet")
        .add_edge("urn:uco:Observable", "bnode://b0", "rdfs__subClassOf")
        .add_edge("urn:uco:Unlabeled", "urn:uco:Observable", "rdfs__domain");
    graph
}

#[tokio::test]
async fn test_build_initial_one_seed_two_neighbors() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let report = builder
        .build_initial(&labels(&["Observable"]), 1)
        .await
        .unwrap();
    let sub = &report.subgraph;

    assert_eq!(report.seeds, labels(&["urn:uco:Observable"]));
    assert!(report.unresolved.is_empty());
    assert_eq!(sub.node_count(), 3);
    assert_eq!(sub.relationship_count(), 2);
    assert_eq!(sub.node("urn:uco:Observable").unwrap().depth, 0);
    assert_eq!(
        sub.leaf_nodes(),
        labels(&["urn:uco:File", "urn:uco:IPAddress"])
    );
    assert_eq!(
        sub.node("urn:uco:Observable").unwrap().comments,
        labels(&["Something that can be observed"])
    );
}

#[tokio::test]
async fn test_relationships_keep_stored_direction() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let report = builder
        .build_initial(&labels(&["Observable"]), 1)
        .await
        .unwrap();
    let sub = &report.subgraph;

    assert!(sub.contains_relationship(&Relationship::new(
        "urn:uco:File",
        "urn:uco:Observable",
        "rdfs__subClassOf"
    )));
    assert!(sub.contains_relationship(&Relationship::new(
        "urn:uco:Observable",
        "urn:uco:IPAddress",
        "uco__hasFacet"
    )));
}

#[tokio::test]
async fn test_blank_and_unlabeled_neighbors_excluded() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let report = builder
        .build_initial(&labels(&["Observable"]), 2)
        .await
        .unwrap();

    assert!(!report.subgraph.contains_node("bnode://b0"));
    assert!(!report.subgraph.contains_node("urn:uco:Unlabeled"));
    assert!(report
        .subgraph
        .relationships()
        .iter()
        .all(|r| !r.source.starts_with("bnode://") && !r.target.starts_with("bnode://")));
}

#[tokio::test]
async fn test_unresolved_labels_reported_not_fatal() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let report = builder
        .build_initial(&labels(&["Quantum Flux", "Observable"]), 0)
        .await
        .unwrap();

    assert_eq!(report.unresolved, labels(&["Quantum Flux"]));
    assert_eq!(report.seeds.len(), 1);
}

#[tokio::test]
async fn test_all_labels_unresolved_gives_empty_subgraph() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let report = builder
        .build_initial(&labels(&["Nothing", "Nada"]), 3)
        .await
        .unwrap();

    assert!(report.all_unresolved());
    assert!(report.subgraph.is_empty());
    assert!(report.subgraph.leaf_nodes().is_empty());
}

#[tokio::test]
async fn test_exact_match_returns_every_node() {
    let mut graph = MemoryGraph::new();
    graph
        .add_labeled("urn:a:Action", "Action")
        .add_labeled("urn:b:Action", "Action")
        .add_labeled("urn:c:ActionPattern", "Action Pattern");
    let builder = SubgraphBuilder::new(&graph);

    let report = builder.build_initial(&labels(&["Action"]), 0).await.unwrap();

    assert_eq!(report.seeds, labels(&["urn:a:Action", "urn:b:Action"]));
}

#[tokio::test]
async fn test_expand_empty_frontier() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let empty = builder.expand_from(&[], 1).await.unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.relationship_count(), 0);

    let base = builder
        .build_initial(&labels(&["Observable"]), 1)
        .await
        .unwrap()
        .subgraph;
    let merged = base.merged(&empty);
    assert_eq!(merged, base);
}

#[tokio::test]
async fn test_expand_from_stamps_relative_depth() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let sub = builder
        .expand_from(&labels(&["urn:uco:File"]), 1)
        .await
        .unwrap();

    assert_eq!(sub.node("urn:uco:File").unwrap().depth, 0);
    assert_eq!(sub.node("urn:uco:Observable").unwrap().depth, 1);
}

#[tokio::test]
async fn test_unknown_frontier_ids_skipped() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let sub = builder
        .expand_from(&labels(&["urn:missing", "bnode://b0"]), 1)
        .await
        .unwrap();

    assert!(sub.is_empty());
}

#[tokio::test]
async fn test_hub_node_capped_at_limit() {
    const LIMIT: usize = 5;

    let mut graph = MemoryGraph::new();
    graph.add_labeled("urn:hub", "Hub");
    for i in 0..LIMIT + 50 {
        let uri = format!("urn:spoke:{}", i);
        graph.add_labeled(uri.clone(), format!("Spoke {}", i));
        graph.add_edge("urn:hub", uri, "links");
    }
    let builder = SubgraphBuilder::new(&graph).with_neighbor_limit(LIMIT);

    let report = builder.build_initial(&labels(&["Hub"]), 1).await.unwrap();

    assert_eq!(report.subgraph.relationship_count(), LIMIT);
    assert_eq!(report.subgraph.node_count(), LIMIT + 1);
}

#[tokio::test]
async fn test_depth_is_shortest_path_within_call() {
    // root -> a -> far, and root -> far directly
    let mut graph = MemoryGraph::new();
    graph
        .add_labeled("urn:root", "Root")
        .add_labeled("urn:a", "A")
        .add_labeled("urn:far", "Far")
        .add_edge("urn:root", "urn:a", "r")
        .add_edge("urn:a", "urn:far", "r")
        .add_edge("urn:root", "urn:far", "r");
    let builder = SubgraphBuilder::new(&graph);

    let report = builder.build_initial(&labels(&["Root"]), 3).await.unwrap();
    let sub = &report.subgraph;

    assert_eq!(sub.node("urn:far").unwrap().depth, 1);
    assert_eq!(sub.node("urn:a").unwrap().depth, 1);
    assert_eq!(sub.relationship_count(), 3);
}

#[tokio::test]
async fn test_traversal_stops_when_level_finds_nothing() {
    let graph = observable_graph();
    let counting = CountingStore::new(&graph);
    let builder = SubgraphBuilder::new(&counting);

    builder
        .build_initial(&labels(&["Observable"]), 10)
        .await
        .unwrap();

    // exact lookup, then one neighbor query for the seed and each of its
    // two neighbors; level 2 discovers nothing so level 3 never runs
    assert_eq!(counting.calls(), 4);
}

#[tokio::test]
async fn test_graph_errors_propagate() {
    let builder = SubgraphBuilder::new(&FailingStore);
    let err = builder
        .build_initial(&labels(&["Observable"]), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Connection(_)));
}

#[tokio::test]
async fn test_expand_subgraph_then_merge_keeps_base_depth() {
    let graph = observable_graph();
    let builder = SubgraphBuilder::new(&graph);

    let mut base: Subgraph = builder
        .build_initial(&labels(&["Observable"]), 1)
        .await
        .unwrap()
        .subgraph;
    let addition = builder
        .expand_subgraph(&base, &labels(&["urn:uco:File"]), 1)
        .await
        .unwrap();
    let stats = base.merge(addition);

    assert_eq!(stats.nodes_added, 0);
    assert_eq!(base.node("urn:uco:Observable").unwrap().depth, 0);
}

struct CountingStore<'a> {
    inner: &'a MemoryGraph,
    calls: std::sync::atomic::AtomicUsize,
}

impl<'a> CountingStore<'a> {
    fn new(inner: &'a MemoryGraph) -> Self {
        Self {
            inner,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GraphStore for CountingStore<'_> {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Row>, GraphError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.run(query).await
    }
}

struct FailingStore;

#[async_trait::async_trait]
impl GraphStore for FailingStore {
    async fn run(&self, _query: &GraphQuery) -> Result<Vec<Row>, GraphError> {
        Err(GraphError::Connection("refused".to_string()))
    }
}
