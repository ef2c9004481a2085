use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{CompanySearch, FieldMap, FilterSpec, JobSearch, Sql, sql_for_partial_update};

/// `{field0: 0, field1: 1, ...}`, every other key translated.
fn build_update(n: usize) -> (FieldMap, Vec<(String, String)>) {
    let data = (0..n).map(|i| (format!("field{i}"), i as i64)).collect();
    let columns = (0..n)
        .step_by(2)
        .map(|i| (format!("field{i}"), format!("column_{i}")))
        .collect();
    (data, columns)
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragments/partial_update");

    for n in [1, 5, 10, 50] {
        let (data, columns) = build_update(n);
        let table: Vec<(&str, &str)> = columns
            .iter()
            .map(|(f, c)| (f.as_str(), c.as_str()))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                let update = sql_for_partial_update(data, table.as_slice()).unwrap();
                black_box(update.set_clause());
            });
        });
    }

    group.finish();
}

fn bench_company_filter(c: &mut Criterion) {
    let search = CompanySearch::new()
        .name("net")
        .min_employees("10")
        .max_employees(300);

    c.bench_function("fragments/company_filter", |b| {
        b.iter(|| {
            let filter = search.compose().unwrap().unwrap();
            let mut sql = Sql::new("SELECT handle FROM companies");
            filter.predicate.append_where(&mut sql).unwrap();
            black_box(sql.to_sql());
        });
    });
}

fn bench_job_filter(c: &mut Criterion) {
    let search = JobSearch::new()
        .title("engineer")
        .min_salary("50000")
        .has_equity("true");

    c.bench_function("fragments/job_filter", |b| {
        b.iter(|| black_box(search.compose().unwrap()));
    });
}

criterion_group!(benches, bench_partial_update, bench_company_filter, bench_job_filter);
criterion_main!(benches);
