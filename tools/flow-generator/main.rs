use clap::Parser;
use mailflow::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fs;

/// A CLI tool to generate random, well-formed email flows for mailflow
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The number of Email nodes to generate
    #[arg(long, default_value_t = 3)]
    emails: usize,

    /// The number of Lead Source nodes to generate
    #[arg(long, default_value_t = 2)]
    leads: usize,

    /// Probability that an Email node gets its own Delay predecessor
    #[arg(long, default_value_t = 0.75)]
    delay_ratio: f64,
}

const SUBJECTS: &[&str] = &[
    "Quick question",
    "Following up",
    "Ideas for your team",
    "Last chance",
    "Can we talk?",
];

const DOMAINS: &[&str] = &["example.com", "acme.io", "mail.example.org"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.emails == 0 || cli.leads == 0 {
        eprintln!("Error: --emails and --leads must both be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.delay_ratio) {
        eprintln!(
            "Error: --delay-ratio ({}) must be between 0 and 1",
            cli.delay_ratio
        );
        std::process::exit(1);
    }

    println!(
        "Generating a flow with {} email(s) and {} lead source(s)...",
        cli.emails, cli.leads
    );

    let mut rng = rand::rng();
    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();

    let mut lead_ids = Vec::with_capacity(cli.leads);
    for i in 0..cli.leads {
        let id = next_id(&nodes, NodeKind::LeadSource);
        let domain = DOMAINS.choose(&mut rng).copied().unwrap_or("example.com");
        nodes.push(Node::lead_source(&id, &format!("lead{}@{}", i + 1, domain)));
        lead_ids.push(id);
    }

    // A flow needs at least one Delay node, so the first email always gets one.
    for i in 0..cli.emails {
        if i == 0 || rng.random_bool(cli.delay_ratio) {
            let id = next_id(&nodes, NodeKind::Delay);
            let unit = [DelayUnit::Minutes, DelayUnit::Hours, DelayUnit::Days]
                .choose(&mut rng)
                .copied()
                .unwrap_or_default();
            nodes.push(Node::delay(&id, rng.random_range(1..=10u32) as f64, unit));
            edges.push(Edge::new(id, format!("{}-{}", NodeKind::Email.as_ref(), nodes.len() + 1)));
        }

        let email_id = next_id(&nodes, NodeKind::Email);
        let subject = SUBJECTS.choose(&mut rng).copied().unwrap_or("Hello");
        nodes.push(Node::email(
            &email_id,
            subject,
            &format!("Hi there,\n\nThis is message {} of the sequence.", i + 1),
        ));

        if let Some(lead_id) = lead_ids.choose(&mut rng) {
            edges.push(Edge::new(lead_id.clone(), email_id));
        }
    }

    let flow = FlowGraph::new(nodes, edges)?;
    FlowValidator::new(&flow).validate()?;
    fs::write(&cli.output, flow.to_json()?)?;

    println!(
        "Successfully generated and saved flow to '{}' ({} nodes, {} edges)",
        cli.output,
        flow.nodes().len(),
        flow.edges().len()
    );

    Ok(())
}

fn next_id(nodes: &[Node], kind: NodeKind) -> String {
    format!("{}-{}", kind.as_ref(), nodes.len() + 1)
}
