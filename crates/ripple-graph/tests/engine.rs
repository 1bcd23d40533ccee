//! End-to-end tests for the graph engine through the public API.
//!
//! These tests build small layered applications and check that cycles,
//! impact and test selection agree with each other.

use std::collections::{BTreeSet, HashMap, HashSet};

use ripple_graph::{
    analyze, default_exclusions, AnalysisResult, ClassNode, ClassSignals, DependencyGraph,
    EdgeInsert, GraphError, GraphProjection,
};

const ENTITY: ClassSignals = ClassSignals {
    persistence_entity: true,
    configuration: false,
};

/// Build a graph from `(name, signals)` pairs and `(from, to)` edges.
fn build(nodes: &[(&str, ClassSignals)], edges: &[(&str, &str)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for (name, signals) in nodes {
        graph
            .add_node(ClassNode::new(
                *name,
                format!("src/main/java/com/shop/{name}.java"),
                "com.shop",
                *signals,
            ))
            .expect("unique names");
    }
    for (from, to) in edges {
        graph.add_dependency(from, to);
    }
    graph
}

fn changed(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(ToString::to_string).collect()
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// Shop application:
///
/// ```text
/// OrderController -> OrderService -> OrderRepository -> Order (entity)
///                                 -> PaymentClient
/// Order <-> Customer (entities referencing each other)
/// OrderService <-> AuditService (service-level cycle)
/// ```
fn shop() -> DependencyGraph {
    let plain = ClassSignals::default();
    build(
        &[
            ("OrderController", plain),
            ("OrderService", plain),
            ("OrderRepository", plain),
            ("PaymentClient", plain),
            ("AuditService", plain),
            ("Order", ENTITY),
            ("Customer", ENTITY),
        ],
        &[
            ("OrderController", "OrderService"),
            ("OrderService", "OrderRepository"),
            ("OrderService", "PaymentClient"),
            ("OrderService", "AuditService"),
            ("AuditService", "OrderService"),
            ("OrderRepository", "Order"),
            ("Order", "Customer"),
            ("Customer", "Order"),
            ("OrderService", "ExternalLibraryType"),
        ],
    )
}

#[test]
fn layered_scenario_selects_justified_tests() {
    let plain = ClassSignals::default();
    let graph = build(
        &[("Controller", plain), ("Service", plain), ("Repository", plain)],
        &[("Service", "Repository"), ("Controller", "Service")],
    );
    let tests = HashMap::from([
        ("Service".to_string(), "ServiceTest".to_string()),
        ("Controller".to_string(), "ControllerTest".to_string()),
    ]);

    let analysis = analyze(&graph, &changed(&["Repository"]), &tests, &HashSet::new());

    assert_eq!(
        analysis.impact.iter().collect::<BTreeSet<_>>(),
        BTreeSet::from(["Controller", "Repository", "Service"])
    );
    assert_eq!(
        analysis.selection.path_for("ServiceTest"),
        Some(strings(&["Repository", "Service"]).as_slice())
    );
    assert_eq!(
        analysis.selection.path_for("ControllerTest"),
        Some(strings(&["Repository", "Service", "Controller"]).as_slice())
    );
    assert_eq!(analysis.selection.len(), 2);
}

#[test]
fn default_exclusions_hide_entity_cycles_but_keep_service_cycles() {
    let graph = shop();
    let excluded = default_exclusions(&graph);

    let analysis = analyze(&graph, &BTreeSet::new(), &HashMap::new(), &excluded);
    let cycles: Vec<Vec<String>> = analysis
        .cycles
        .cycles
        .iter()
        .map(|cycle| cycle.canonical().into_names())
        .collect();

    assert_eq!(cycles, vec![strings(&["AuditService", "OrderService", "AuditService"])]);
    assert!(
        analysis
            .cycles
            .pruned_edges
            .iter()
            .any(|edge| edge.from == "OrderRepository" && edge.to == "Order"),
        "edge into the excluded entity should be reported as pruned"
    );

    let unfiltered = analyze(&graph, &BTreeSet::new(), &HashMap::new(), &HashSet::new());
    assert_eq!(unfiltered.cycles.cycles.len(), 2);
}

#[test]
fn changed_entity_propagates_to_controller() {
    let graph = shop();
    let tests = HashMap::from([(
        "OrderController".to_string(),
        "com.shop.OrderControllerTest".to_string(),
    )]);

    let analysis = analyze(&graph, &changed(&["Customer"]), &tests, &default_exclusions(&graph));

    assert_eq!(
        analysis.selection.path_for("com.shop.OrderControllerTest"),
        Some(
            strings(&[
                "Customer",
                "Order",
                "OrderRepository",
                "OrderService",
                "OrderController"
            ])
            .as_slice()
        )
    );
}

#[test]
fn dangling_references_are_dropped_without_error() {
    let mut graph = shop();

    assert_eq!(
        graph.add_dependency("OrderService", "ExternalLibraryType"),
        EdgeInsert::Dropped
    );
    assert!(graph.get_node("ExternalLibraryType").is_none());
    assert!(!graph.dependencies("OrderService").contains(&"ExternalLibraryType"));
}

#[test]
fn duplicate_registration_is_reported() {
    let mut graph = shop();

    let result = graph.add_node(ClassNode::new(
        "OrderService",
        "legacy/OrderService.java",
        "com.legacy",
        ClassSignals::default(),
    ));

    assert!(matches!(result, Err(GraphError::DuplicateNode { .. })));
    assert_eq!(
        graph.get_node("OrderService").map(ClassNode::namespace),
        Some("com.shop")
    );
}

#[test]
fn analysis_result_serializes_for_reporting() {
    let graph = shop();
    let tests = HashMap::from([("OrderService".to_string(), "OrderServiceTest".to_string())]);
    let analysis = analyze(&graph, &changed(&["PaymentClient"]), &tests, &default_exclusions(&graph));

    let result = AnalysisResult::new(&analysis, "no notes");
    let json = serde_json::to_value(&result).expect("serializable");

    assert_eq!(
        json["impactedTestsWithPaths"]["OrderServiceTest"],
        serde_json::json!(["PaymentClient", "OrderService"])
    );
    assert_eq!(json["advisoryText"], "no notes");
    assert_eq!(json["cycles"][0].as_array().map(Vec::len), Some(3));
}

#[test]
fn reporting_projection_omits_data_carriers() {
    let graph = shop();

    let projection = GraphProjection::from_graph(&graph, &default_exclusions(&graph));

    assert!(projection.get("Order").is_none());
    assert!(projection.get("OrderRepository").unwrap().depends_on.is_empty());
    assert_eq!(projection.len(), 5);
}
