//! PostgreSQL adapter for DrawRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    Budget, Draw, DrawId, DrawStatus, DrawSummary, NewDraw, Participant, ParticipantId,
};
use crate::domain::ports::DrawRepository;
use crate::entity::{draws, participants};
use crate::error::DomainError;

/// PostgreSQL implementation of DrawRepository
pub struct PostgresDrawRepository {
    db: DatabaseConnection,
}

impl PostgresDrawRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Load a draw's participants in registration order
async fn load_participants<C: ConnectionTrait>(
    conn: &C,
    draw_id: Uuid,
) -> Result<Vec<participants::Model>, DomainError> {
    participants::Entity::find()
        .filter(participants::Column::DrawId.eq(draw_id))
        .order_by_asc(participants::Column::CreatedAt)
        .order_by_asc(participants::Column::Id)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))
}

#[async_trait]
impl DrawRepository for PostgresDrawRepository {
    async fn exists_by_code(&self, code: &str) -> Result<bool, DomainError> {
        let count = draws::Entity::find()
            .filter(draws::Column::Code.eq(code))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, code: &str, draw: &NewDraw) -> Result<Draw, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = draws::ActiveModel {
            id: Set(id),
            code: Set(code.to_string()),
            name: Set(draw.name.clone()),
            description: Set(draw.description.clone()),
            draw_date: Set(draw.draw_date.map(|d| d.fixed_offset())),
            budget_limit_cents: Set(draw.budget_limit.map(|b| b.cents())),
            status: Set(DrawStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stored = Vec::with_capacity(draw.participants.len());
        for participant in &draw.participants {
            let model = participants::ActiveModel {
                id: Set(Uuid::new_v4()),
                draw_id: Set(id),
                name: Set(participant.name.clone()),
                email: Set(participant.email.clone()),
                phone: Set(participant.phone.clone()),
                assigned_to_id: Set(None),
                notification_sent: Set(false),
                notification_sent_at: Set(None),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
            stored.push(model);
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_draw(model, stored)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<DrawSummary>, DomainError> {
        let Some(model) = draws::Entity::find()
            .filter(draws::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let count = participants::Entity::find()
            .filter(participants::Column::DrawId.eq(model.id))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut summary = to_draw(model, Vec::new())?.summary();
        summary.participant_count = count as usize;
        Ok(Some(summary))
    }

    async fn find_by_code_with_participants(
        &self,
        code: &str,
    ) -> Result<Option<Draw>, DomainError> {
        let Some(model) = draws::Entity::find()
            .filter(draws::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let participants = load_participants(&self.db, model.id).await?;
        to_draw(model, participants).map(Some)
    }

    async fn apply_assignments(
        &self,
        id: &DrawId,
        assignments: &[(ParticipantId, ParticipantId)],
    ) -> Result<Draw, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // SELECT ... FOR UPDATE: a concurrent execution blocks here until we commit
        let draw = draws::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Draw {} not found", id)))?;

        if !parse_status(&draw.status)?.accepts_execution() {
            // Dropping the transaction rolls it back
            return Err(DomainError::AlreadyExecuted(draw.code));
        }

        for (giver, receiver) in assignments {
            let result = participants::Entity::update_many()
                .col_expr(
                    participants::Column::AssignedToId,
                    Expr::value(Some(receiver.0)),
                )
                .filter(participants::Column::Id.eq(giver.0))
                .filter(participants::Column::DrawId.eq(id.0))
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;

            if result.rows_affected != 1 {
                return Err(DomainError::Internal(format!(
                    "Participant {} does not belong to draw {}",
                    giver, id
                )));
            }
        }

        let mut active: draws::ActiveModel = draw.into();
        active.status = Set(DrawStatus::Drawn.to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let participants = load_participants(&txn, updated.id).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_draw(updated, participants)
    }

    async fn mark_notification_sent(
        &self,
        id: &ParticipantId,
        sent_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        participants::ActiveModel {
            id: Set(id.0),
            notification_sent: Set(true),
            notification_sent_at: Set(Some(sent_at.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

fn parse_status(status: &str) -> Result<DrawStatus, DomainError> {
    status.parse().map_err(DomainError::Database)
}

/// Convert SeaORM models to the domain aggregate
fn to_draw(model: draws::Model, participants: Vec<participants::Model>) -> Result<Draw, DomainError> {
    Ok(Draw {
        id: DrawId(model.id),
        code: model.code,
        name: model.name,
        description: model.description,
        draw_date: model.draw_date.map(|dt| dt.with_timezone(&Utc)),
        budget_limit: model.budget_limit_cents.and_then(Budget::from_cents),
        status: parse_status(&model.status)?,
        participants: participants.into_iter().map(Participant::from).collect(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

/// Convert SeaORM model to domain entity
impl From<participants::Model> for Participant {
    fn from(model: participants::Model) -> Self {
        Participant {
            id: ParticipantId(model.id),
            draw_id: DrawId(model.draw_id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            assigned_to: model.assigned_to_id.map(ParticipantId),
            notification_sent: model.notification_sent,
            notification_sent_at: model.notification_sent_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
