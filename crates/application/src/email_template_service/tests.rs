use std::sync::Arc;

use rolegate_core::AppError;
use rolegate_domain::{AuditAction, UserId};

use crate::test_support::{InMemoryStore, actor};

use super::{EmailTemplateService, SaveEmailTemplateInput};

fn input(name: &str) -> SaveEmailTemplateInput {
    SaveEmailTemplateInput {
        name: name.to_owned(),
        subject: "Hello {{name}}".to_owned(),
        body_text: "Welcome aboard, {{name}}.".to_owned(),
        body_html: None,
        description: "Sent after sign-up".to_owned(),
        is_active: true,
    }
}

#[tokio::test]
async fn template_lifecycle_is_audited() {
    let store = Arc::new(InMemoryStore::default());
    let service = EmailTemplateService::new(store.clone(), store.clone());
    let admin = actor(
        UserId::new(),
        &["admin"],
        &["email_templates.read", "email_templates.write"],
    );

    let created = service
        .create_template(&admin, input("welcome"))
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    let mut changed = input("welcome");
    changed.subject = "Welcome {{name}}".to_owned();
    let updated = service
        .update_template(&admin, created.template.id(), changed)
        .await
        .unwrap_or_else(|_| panic!("update should succeed"));
    assert_eq!(updated.template.subject(), "Welcome {{name}}");

    assert!(service
        .delete_template(&admin, created.template.id())
        .await
        .is_ok());
    assert!(matches!(
        service.get_template(&admin, created.template.id()).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(
        store.audit_actions().await,
        vec![
            AuditAction::EmailTemplateCreated,
            AuditAction::EmailTemplateUpdated,
            AuditAction::EmailTemplateDeleted,
        ]
    );
}

#[tokio::test]
async fn duplicate_template_name_is_a_conflict() {
    let store = Arc::new(InMemoryStore::default());
    let service = EmailTemplateService::new(store.clone(), store.clone());
    let admin = actor(UserId::new(), &["admin"], &["email_templates.write"]);

    assert!(service.create_template(&admin, input("welcome")).await.is_ok());
    let result = service.create_template(&admin, input("welcome")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn reading_templates_requires_permission() {
    let store = Arc::new(InMemoryStore::default());
    let service = EmailTemplateService::new(store.clone(), store.clone());
    let member = actor(UserId::new(), &["user"], &[]);

    let result = service.list_templates(&member).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
