//! Accounts API demo
//!
//! Run with `cargo run --example accounts`, then:
//!
//! ```text
//! curl -X POST localhost:1337/api/accounts -H 'content-type: application/json' \
//!      -d '{"username":"admin","password":"Secret123"}'
//! curl 'localhost:1337/api/accounts?page=1&limit=10&order_by=username&order_dir=asc'
//! ```

use chrono::{DateTime, Utc};
use restkit::core::validation::FieldErrors;
use restkit::prelude::*;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    id: String,
    username: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl Record for Account {
    fn resource() -> &'static str {
        "account"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["username"]
    }
}

/// Public view of an account; never exposes the password
#[derive(Debug, Serialize)]
struct AccountView {
    id: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AccountStoreRequest {
    username: String,
    password: String,
}

impl_validate!(AccountStoreRequest {
    username => [required(), min(3), max(16)],
    password => [required(), min(8), max(32), password()],
});

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AccountUpdateRequest {
    password: String,
}

impl_validate!(AccountUpdateRequest {
    password => [required(), min(8), max(32), password()],
});

struct AccountController {
    repo: InMemoryRepository<Account>,
}

impl AccountController {
    fn not_found(id: String) -> ApiError {
        EntityError::NotFound {
            resource: Account::resource().to_string(),
            id,
        }
        .into()
    }
}

#[async_trait]
impl ResourceController for AccountController {
    type StoreRequest = AccountStoreRequest;
    type UpdateRequest = AccountUpdateRequest;

    fn prefix(&self) -> &str {
        "accounts"
    }

    async fn index(&self, params: QueryParams) -> ApiResult<Response> {
        let page = self.repo.list(&params).await?;
        let views = page.items.into_iter().map(AccountView::from).collect();
        Ok(Reply::success(
            "success",
            PaginatedResponse::new(views, &params, page.total),
        ))
    }

    async fn show(&self, id: String) -> ApiResult<Response> {
        match self.repo.find(&id).await? {
            Some(account) => Ok(Reply::success("success", AccountView::from(account))),
            None => Err(Self::not_found(id)),
        }
    }

    async fn store(&self, request: AccountStoreRequest) -> ApiResult<Response> {
        if self.repo.exists("username", &json!(request.username)).await? {
            let mut errors = FieldErrors::new();
            errors.insert("username", "username has already been taken");
            return Ok(Reply::form_error("creating account", errors));
        }

        let account = self
            .repo
            .create(Account {
                id: Uuid::new_v4().to_string(),
                username: request.username,
                password: request.password,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(id = %account.id, "account created");
        Ok(Reply::success("success", AccountView::from(account)))
    }

    async fn update(&self, id: String, request: AccountUpdateRequest) -> ApiResult<Response> {
        let mut values = UpdateMap::new();
        values.insert("password".to_string(), json!(request.password));

        match self.repo.update(&id, values).await? {
            Some(account) => Ok(Reply::success("success", AccountView::from(account))),
            None => Err(Self::not_found(id)),
        }
    }

    async fn destroy(&self, id: String) -> ApiResult<Response> {
        if self.repo.delete(&id).await? {
            Ok(Reply::success("deleted", ()))
        } else {
            Err(Self::not_found(id))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_yaml_str(
        r#"
app_name: Accounts API
url_prefix: /api
health: true
catch_all: true
cors:
  enabled: true
logging:
  level: debug
"#,
    )?;
    init_tracing(&config.logging);

    let builder = ServerBuilder::from_config(config).resource(
        "/accounts",
        AccountController {
            repo: InMemoryRepository::new(),
        },
    );

    println!("{}", builder.routes().render());

    builder.serve().await
}
