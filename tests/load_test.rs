//! Concurrent load against the account API.

use std::collections::HashSet;
use std::time::Instant;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_concurrent_creates_and_reads() {
    let customer_addr =
        common::start_customer_service(|id| async move { (200, common::customer_json(&id)) }).await;
    let (addr, shutdown) = common::start_account_service(customer_addr, |_| {}).await;

    let concurrency = 10;
    let accounts_per_task = 20;
    let total = concurrency * accounts_per_task;

    let client = common::http_client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let base = format!("http://{}", addr);
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..accounts_per_task {
                let created: Value = client
                    .post(format!("{}/accounts", base))
                    .json(&json!({ "customerId": format!("C{}", task), "accountType": "SAVINGS" }))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                let id = created["accountId"].as_str().unwrap().to_string();

                let fetched: Value = client
                    .get(format!("{}/accounts/{}", base, id))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                assert_eq!(fetched["customer"]["customerId"], format!("C{}", task));
                ids.push(id);
            }
            ids
        }));
    }

    let mut unique = HashSet::new();
    for task in tasks {
        for id in task.await.unwrap() {
            assert!(unique.insert(id), "account ids must be unique");
        }
    }
    assert_eq!(unique.len(), total);

    let all: Vec<Value> = client
        .get(format!("http://{}/accounts", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), total);

    let owned: Vec<Value> = client
        .get(format!("http://{}/accounts/customer/C3", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(owned.len(), accounts_per_task);

    println!("{} creates + {} reads in {:?}", total, total, start.elapsed());
    shutdown.trigger();
}
