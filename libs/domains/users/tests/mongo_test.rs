//! Registration against a real MongoDB (requires Docker)

use axum_helpers::{JwtConfig, TokenIssuer};
use domain_users::*;
use test_utils::{TestDataBuilder, TestMongo};

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&JwtConfig::new("users-mongo-test-secret-0123456789").unwrap())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_index_guards_concurrent_registration() {
    let mongo = TestMongo::new().await;
    let service = UserService::new(mongo.collection::<User>("users"), issuer());
    service.init_indexes().await.unwrap();

    let email = TestDataBuilder::from_test_name("mongo_race").email("race");
    let input = || RegisterUser {
        email: email.clone(),
        password: "longenoughpassword".to_string(),
    };

    let (first, second) = tokio::join!(service.register(input()), service.register(input()));
    let outcomes = [first, second];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(UserError::DuplicateEmail(_))))
    );

    let login = service
        .authenticate(LoginRequest {
            email: email.clone(),
            password: "longenoughpassword".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.email, email);
}
