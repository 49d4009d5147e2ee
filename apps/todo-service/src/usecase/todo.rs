//! Todo 管理ユースケース

use std::sync::Arc;

use todo_domain::{
    ValidationErrors,
    clock::Clock,
    todo::{
        NAME_FIELD,
        NAME_TAKEN_MESSAGE,
        NewTodo,
        Todo,
        TodoId,
        TodoName,
        TodoStatus,
        normalize_todo_name,
        validate_todo_name,
    },
};
use todo_infra::{InfraError, repository::TodoRepository};

use crate::error::{TodoOperation, TodoServiceError};

/// Todo 作成の入力
#[derive(Debug, Clone, Default)]
pub struct CreateTodoInput {
    pub name: Option<String>,
}

/// Todo 更新の入力
///
/// `status` は検証せず、`None` もそのまま書き込む。
#[derive(Debug, Clone)]
pub struct UpdateTodoInput {
    pub id:     TodoId,
    pub name:   Option<String>,
    pub status: Option<TodoStatus>,
}

/// Todo 管理ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
    clock:           Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            todo_repository,
            clock,
        }
    }

    /// Todo 一覧を取得する（status 昇順 → 作成日時降順）
    pub async fn list_todos(&self) -> Result<Vec<Todo>, TodoServiceError> {
        self.todo_repository
            .find_all()
            .await
            .map_err(TodoServiceError::storage(TodoOperation::List))
    }

    /// Todo を作成する
    ///
    /// 1. 名前のバリデーション（required / min / max / unique）
    /// 2. 初期状態で挿入
    /// 3. 同時作成による一意制約違反は unique のバリデーションエラーにマッピング
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, TodoServiceError> {
        let name = self
            .validate_name(input.name.as_deref(), TodoOperation::Create)
            .await?;

        let new_todo = NewTodo::new(name, self.clock.now());
        self.todo_repository
            .insert(&new_todo)
            .await
            .map_err(write_error(TodoOperation::Create))
    }

    /// Todo を更新する
    ///
    /// 名前のバリデーションは、送信された名前が現在の名前と異なる場合のみ行う。
    /// 名前が同じでも、名前と状態の両方を書き込む。
    pub async fn update_todo(&self, input: UpdateTodoInput) -> Result<Todo, TodoServiceError> {
        let todo = self.find_todo(input.id, TodoOperation::Update).await?;

        let submitted = normalize_todo_name(input.name.as_deref());
        let name = if submitted.as_deref() == Some(todo.name().as_str()) {
            todo.name().clone()
        } else {
            self.validate_name(input.name.as_deref(), TodoOperation::Update)
                .await?
        };

        let updated = todo.update(name, input.status, self.clock.now());
        self.todo_repository
            .update(&updated)
            .await
            .map_err(write_error(TodoOperation::Update))?;

        Ok(updated)
    }

    /// Todo を削除する（物理削除）
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), TodoServiceError> {
        let todo = self.find_todo(id, TodoOperation::Delete).await?;

        self.todo_repository
            .delete(todo.id())
            .await
            .map_err(TodoServiceError::storage(TodoOperation::Delete))
    }

    async fn find_todo(
        &self,
        id: TodoId,
        operation: TodoOperation,
    ) -> Result<Todo, TodoServiceError> {
        self.todo_repository
            .find_by_id(id)
            .await
            .map_err(TodoServiceError::storage(operation))?
            .ok_or(TodoServiceError::NotFound)
    }

    /// 名前の重複をストレージに問い合わせたうえでバリデーションする
    async fn validate_name(
        &self,
        raw: Option<&str>,
        operation: TodoOperation,
    ) -> Result<TodoName, TodoServiceError> {
        let name_taken = match normalize_todo_name(raw) {
            Some(name) => self
                .todo_repository
                .exists_by_name(&name)
                .await
                .map_err(TodoServiceError::storage(operation))?,
            None => false,
        };

        validate_todo_name(raw, name_taken).map_err(TodoServiceError::Validation)
    }
}

/// 書き込み時のエラー変換
///
/// 一意制約違反は事前チェック後の同時書き込みなので、重複エラーとして返す。
fn write_error(operation: TodoOperation) -> impl FnOnce(InfraError) -> TodoServiceError {
    move |source| {
        if source.is_unique_violation() {
            tracing::warn!("名前の一意制約違反を検出しました: {}", source);
            TodoServiceError::Validation(ValidationErrors::single(NAME_FIELD, NAME_TAKEN_MESSAGE))
        } else {
            TodoServiceError::Storage { operation, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use todo_domain::{
        clock::FixedClock,
        todo::{NAME_REQUIRED_MESSAGE, NAME_TOO_LONG_MESSAGE, NAME_TOO_SHORT_MESSAGE},
    };
    use todo_infra::mock::MockTodoRepository;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn existing(id: i64, name: &str, status: Option<TodoStatus>) -> Todo {
        Todo::from_db(
            TodoId::from_i64(id),
            TodoName::from_db(name.to_string()),
            status,
            fixed_now(),
            fixed_now(),
        )
    }

    fn sut(repo: &MockTodoRepository) -> TodoUseCaseImpl {
        TodoUseCaseImpl::new(
            Arc::new(repo.clone()),
            Arc::new(FixedClock::new(fixed_now())),
        )
    }

    fn validation_messages(result: Result<Todo, TodoServiceError>) -> Vec<String> {
        match result {
            Err(TodoServiceError::Validation(errors)) => errors.messages(NAME_FIELD).to_vec(),
            other => panic!("バリデーションエラーを期待: {other:?}"),
        }
    }

    // ===== create_todo =====

    #[tokio::test]
    async fn test_create_todo_初期状態で保存される() {
        let repo = MockTodoRepository::new();

        let created = sut(&repo)
            .create_todo(CreateTodoInput {
                name: Some("Groceries".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.name().as_str(), "Groceries");
        assert_eq!(created.status(), Some(TodoStatus::Created));
        assert_eq!(created.created_at(), fixed_now());
        assert_eq!(repo.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn test_create_todo_名前未指定はrequiredエラー() {
        let repo = MockTodoRepository::new();

        let result = sut(&repo).create_todo(CreateTodoInput::default()).await;

        assert_eq!(validation_messages(result), [NAME_REQUIRED_MESSAGE]);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_create_todo_長さ違反はminとmaxのメッセージを返す() {
        let repo = MockTodoRepository::new();
        let usecase = sut(&repo);

        let too_short = usecase
            .create_todo(CreateTodoInput {
                name: Some("ab".to_string()),
            })
            .await;
        let too_long = usecase
            .create_todo(CreateTodoInput {
                name: Some("abcdefghijklmnopqrstu".to_string()),
            })
            .await;

        assert_eq!(validation_messages(too_short), [NAME_TOO_SHORT_MESSAGE]);
        assert_eq!(validation_messages(too_long), [NAME_TOO_LONG_MESSAGE]);
    }

    #[tokio::test]
    async fn test_create_todo_既存の名前はuniqueエラー() {
        let repo = MockTodoRepository::with_todos(vec![existing(1, "Groceries", None)]);

        let result = sut(&repo)
            .create_todo(CreateTodoInput {
                name: Some("Groceries".to_string()),
            })
            .await;

        assert_eq!(validation_messages(result), [NAME_TAKEN_MESSAGE]);
    }

    /// 事前チェックでは重複なしと答え、挿入時に一意制約違反を返すリポジトリ
    struct RacingRepository;

    #[async_trait]
    impl TodoRepository for RacingRepository {
        async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
            Ok(Some(existing(id.as_i64(), "Before", None)))
        }

        async fn exists_by_name(&self, _name: &str) -> Result<bool, InfraError> {
            Ok(false)
        }

        async fn insert(&self, _todo: &NewTodo) -> Result<Todo, InfraError> {
            Err(InfraError::unique_violation("todos_name_key"))
        }

        async fn update(&self, _todo: &Todo) -> Result<(), InfraError> {
            Err(InfraError::unique_violation("todos_name_key"))
        }

        async fn delete(&self, _id: TodoId) -> Result<(), InfraError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_同時書き込みによる一意制約違反はuniqueエラーになる() {
        let usecase = TodoUseCaseImpl::new(
            Arc::new(RacingRepository),
            Arc::new(FixedClock::new(fixed_now())),
        );

        let created = usecase
            .create_todo(CreateTodoInput {
                name: Some("Groceries".to_string()),
            })
            .await;
        let updated = usecase
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(1),
                name:   Some("Groceries".to_string()),
                status: None,
            })
            .await;

        assert_eq!(validation_messages(created), [NAME_TAKEN_MESSAGE]);
        assert_eq!(validation_messages(updated), [NAME_TAKEN_MESSAGE]);
    }

    // ===== update_todo =====

    #[tokio::test]
    async fn test_update_todo_存在しないidはnot_found() {
        let repo = MockTodoRepository::new();

        let result = sut(&repo)
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(9999),
                name:   Some("Groceries".to_string()),
                status: Some(TodoStatus::Completed),
            })
            .await;

        assert!(matches!(result, Err(TodoServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_todo_名前が同じなら名前のバリデーションを行わない() {
        // 現在の名前は長さルールに違反しているが、変更がないので検証されない
        let repo = MockTodoRepository::with_todos(vec![existing(
            1,
            "ab",
            Some(TodoStatus::Created),
        )]);

        let updated = sut(&repo)
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(1),
                name:   Some("ab".to_string()),
                status: Some(TodoStatus::Completed),
            })
            .await
            .unwrap();

        assert_eq!(updated.name().as_str(), "ab");
        assert_eq!(updated.status(), Some(TodoStatus::Completed));
        assert_eq!(repo.snapshot(), vec![updated]);
    }

    #[tokio::test]
    async fn test_update_todo_他のtodoと重複する名前はuniqueエラー() {
        let repo = MockTodoRepository::with_todos(vec![
            existing(1, "Groceries", Some(TodoStatus::Created)),
            existing(2, "Laundry", Some(TodoStatus::Created)),
        ]);

        let result = sut(&repo)
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(1),
                name:   Some("Laundry".to_string()),
                status: Some(TodoStatus::Created),
            })
            .await;

        assert_eq!(validation_messages(result), [NAME_TAKEN_MESSAGE]);
        assert_eq!(repo.snapshot()[0].name().as_str(), "Groceries");
    }

    #[tokio::test]
    async fn test_update_todo_名前を省略するとrequiredエラー() {
        let repo = MockTodoRepository::with_todos(vec![existing(1, "Groceries", None)]);

        let result = sut(&repo)
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(1),
                name:   None,
                status: Some(TodoStatus::Completed),
            })
            .await;

        assert_eq!(validation_messages(result), [NAME_REQUIRED_MESSAGE]);
    }

    #[tokio::test]
    async fn test_update_todo_statusの省略はnullとして書き込まれる() {
        let repo = MockTodoRepository::with_todos(vec![existing(
            1,
            "Groceries",
            Some(TodoStatus::Completed),
        )]);

        let updated = sut(&repo)
            .update_todo(UpdateTodoInput {
                id:     TodoId::from_i64(1),
                name:   Some("Groceries".to_string()),
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.status(), None);
    }

    // ===== delete_todo =====

    #[tokio::test]
    async fn test_delete_todo_削除後に再削除するとnot_found() {
        let repo = MockTodoRepository::with_todos(vec![existing(1, "Groceries", None)]);
        let usecase = sut(&repo);

        usecase.delete_todo(TodoId::from_i64(1)).await.unwrap();
        let second = usecase.delete_todo(TodoId::from_i64(1)).await;

        assert!(repo.snapshot().is_empty());
        assert!(matches!(second, Err(TodoServiceError::NotFound)));
    }

    // ===== ストレージ障害 =====

    #[tokio::test]
    async fn test_ストレージ障害は操作ごとのstorageエラーになる() {
        let repo = MockTodoRepository::with_todos(vec![existing(1, "Groceries", None)]);
        repo.fail_storage();
        let usecase = sut(&repo);

        let list = usecase.list_todos().await.unwrap_err();
        let create = usecase
            .create_todo(CreateTodoInput {
                name: Some("Laundry".to_string()),
            })
            .await
            .unwrap_err();
        let delete = usecase.delete_todo(TodoId::from_i64(1)).await.unwrap_err();

        assert!(matches!(
            list,
            TodoServiceError::Storage {
                operation: TodoOperation::List,
                ..
            }
        ));
        assert!(matches!(
            create,
            TodoServiceError::Storage {
                operation: TodoOperation::Create,
                ..
            }
        ));
        assert!(matches!(
            delete,
            TodoServiceError::Storage {
                operation: TodoOperation::Delete,
                ..
            }
        ));
    }
}
