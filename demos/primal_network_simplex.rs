use netsimplex::{Graph, StepType, TransportSolver};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netsimplex=debug")))
        .with_target(false)
        .init();

    let mut graph = Graph::new();
    graph.add_node("a", 2.0).unwrap();
    graph.add_node("b", 0.0).unwrap();
    graph.add_node("c", 0.0).unwrap();
    graph.add_node("d", -2.0).unwrap();

    graph.add_edge("a", "b", 1.0, 2.0).unwrap();
    graph.add_edge("a", "c", 2.0, 1.0).unwrap();
    graph.add_edge("b", "c", 1.0, 1.0).unwrap();
    graph.add_edge("b", "d", 3.0, 1.0).unwrap();
    graph.add_edge("c", "d", 1.0, 2.0).unwrap();

    let mut solver = TransportSolver::new(graph);
    solver.solve_step_by_step().expect("solve");

    let state = solver.current_state();
    assert_eq!(state.step_type, StepType::Optimal);
    println!("minimum cost: {}", state.objective_value);
    for (edge, flow) in &state.flows {
        println!("{edge}: {flow}");
    }
}
