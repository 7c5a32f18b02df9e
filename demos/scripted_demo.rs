use chained_hash::ChainedHashTable;
use chained_hash::Value;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial-capacity", default_value_t = 8)]
    initial_capacity: usize,
}

fn show(value: Option<Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "not found".to_string(),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut table = ChainedHashTable::with_capacity(args.initial_capacity);
    println!("Created table with {} buckets", table.capacity());

    table.insert(10, 100);
    table.insert(20, 200);
    table.insert(30, 300);

    println!("Get key 20: {}", show(table.get(20)));

    table.remove(20);
    println!("Get key 20 after removal: {}", show(table.get(20)));

    println!(
        "Size: {}, capacity: {}, load factor: {:.3}",
        table.len(),
        table.capacity(),
        table.load_factor()
    );
}
