//! Benchmarks for the SCL grammar.
//!
//! Run with: `cargo bench --package statecraft_grammar_scl`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use statecraft_grammar::Parser;

const ORDERS: &str = r"
type Order { id: int; total: float; }
context Db { orders: List[Order]; }

state Pending uses Db {
    precondition { \E Relation orders o by o.id : o.total > 0; }
    select o: Order from orders where o.total > 0 limit 1;
    update orders set total = o.total * 2 where id = o.id;
    commit;
    next {
        when o.total > 100 => Review
        otherwise => Shipped
    }
}

state Review uses Db {
    next { otherwise => Shipped }
}

state Shipped uses Db {
    next { otherwise => Shipped }
}
";

fn parser() -> Parser {
    let mut parser = Parser::new();
    parser
        .set_language(&statecraft_grammar_scl::LANGUAGE.into())
        .expect("Error loading SCL grammar");
    parser
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("scl_parse");
    let parser = parser();

    group.throughput(Throughput::Bytes(ORDERS.len() as u64));
    group.bench_with_input(BenchmarkId::new("orders", ORDERS.len()), ORDERS, |b, s| {
        b.iter(|| parser.parse(black_box(s)));
    });

    for states in [10, 100] {
        let source: String = (0..states)
            .map(|i| {
                format!(
                    "state S{i} uses Db {{ let n: int = {i} + 1; next {{ when n > 1 => S{} otherwise => S{i} }} }}\n",
                    (i + 1) % states
                )
            })
            .collect();
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("states", states), &source, |b, s| {
            b.iter(|| parser.parse(black_box(s)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
