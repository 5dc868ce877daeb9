use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::RegisterInput;
use service::auth::password::Argon2Hasher;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::service::AuthService;
use service::auth::validation::validate_registration;

fn input(email: String) -> RegisterInput {
    RegisterInput {
        name: Some("Bench".into()),
        email: Some(email),
        password: Some("Benchmark#1".into()),
    }
}

fn bench_validation(c: &mut Criterion) {
    let payload = input("bench@example.com".into());
    c.bench_function("auth_validate_registration", |b| {
        b.iter(|| validate_registration(&payload).unwrap());
    });
}

fn bench_register(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, Argon2Hasher::default());
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut n = 0u64;

    c.bench_function("auth_register_default_cost", |b| {
        b.iter(|| {
            n += 1;
            rt.block_on(svc.register(input(format!("bench{n}@example.com")))).unwrap();
        });
    });
}

criterion_group!(benches, bench_validation, bench_register);
criterion_main!(benches);
