use axum_catalog_api::{
    catalog::{
        EntityKind, LocalizedText, TextField,
        graph::CatalogGraph,
        guard,
        model::Category,
    },
    db::{create_orm_conn, run_migrations},
    error::{AppError, AppResult},
    repository::{self, SaveMode, begin_write, load_catalog},
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use uuid::Uuid;

// Two writers check the same name against their own snapshot, then both
// insert it. Only one of them may commit.
#[tokio::test]
async fn racing_duplicate_names_cannot_both_commit() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run write conflict tests."
            );
            return Ok(());
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let name: LocalizedText = [("en", format!("Race {}", Uuid::now_v7().simple()))]
        .into_iter()
        .collect();

    let first = begin_write(&orm).await?;
    let second = begin_write(&orm).await?;
    let mut first_graph = load_catalog(&first).await?;
    let mut second_graph = load_catalog(&second).await?;

    // Both snapshots agree the name is free.
    for graph in [&first_graph, &second_graph] {
        guard::ensure_unique_text(graph, EntityKind::Category, TextField::Name, &name, None)?;
    }

    let first_id = insert_category(&first, &mut first_graph, &name).await?;
    let second_outcome: AppResult<()> = async {
        insert_category(&second, &mut second_graph, &name).await?;
        first.commit().await?;
        second.commit().await?;
        Ok(())
    }
    .await;

    let err = second_outcome.expect_err("one of the writers must lose");
    assert!(matches!(err, AppError::Conflict), "{err:?}");

    cleanup(&orm, first_id).await?;
    Ok(())
}

async fn insert_category<C: ConnectionTrait>(
    conn: &C,
    graph: &mut CatalogGraph,
    name: &LocalizedText,
) -> AppResult<Uuid> {
    let id = Uuid::now_v7();
    graph.insert(Category { id });
    graph.set_text(EntityKind::Category, id, TextField::Name, name);
    repository::save(conn, graph, EntityKind::Category, id, SaveMode::Insert).await?;
    Ok(id)
}

async fn cleanup(orm: &DatabaseConnection, id: Uuid) -> anyhow::Result<()> {
    // The first writer only loses when its own commit was the one refused.
    match repository::delete_entity(orm, EntityKind::Category, id).await {
        Ok(()) | Err(AppError::NotFound { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
