use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

use crate::entities::{employees, prelude::*};
use crate::models::employee::{Employee, NewEmployee};

/// Repository for employee operations
pub struct EmployeeRepository {
    conn: DatabaseConnection,
}

impl EmployeeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_live(&self, employee_id: &str) -> Result<Option<employees::Model>> {
        Employees::find()
            .filter(employees::Column::EmployeeId.eq(employee_id))
            .filter(employees::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query employee")
    }

    pub async fn get(&self, employee_id: &str) -> Result<Option<Employee>> {
        Ok(self.find_live(employee_id).await?.map(Employee::from))
    }

    pub async fn list_for_farm(&self, farm_id: &str) -> Result<Vec<Employee>> {
        let rows = Employees::find()
            .filter(employees::Column::FarmId.eq(farm_id))
            .filter(employees::Column::DeletedAt.is_null())
            .order_by_asc(employees::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list employees")?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    pub async fn insert(&self, employee: NewEmployee) -> Result<Employee> {
        let now = Utc::now().to_rfc3339();

        let active = employees::ActiveModel {
            employee_id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(employee.user_id),
            farm_id: Set(employee.farm_id),
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            position: Set(employee.position),
            salary: Set(employee.salary),
            hire_date: Set(employee.hire_date),
            contact_info: Set(employee.contact_info),
            status: Set(employee.status),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert employee")?;

        info!(employee_id = %model.employee_id, farm_id = %model.farm_id, "Created employee");
        Ok(Employee::from(model))
    }

    pub async fn update(&self, employee: &Employee) -> Result<Employee> {
        let row = self
            .find_live(&employee.employee_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Employee not found: {}", employee.employee_id))?;

        let mut active: employees::ActiveModel = row.into();
        active.user_id = Set(employee.user_id.clone());
        active.first_name = Set(employee.first_name.clone());
        active.last_name = Set(employee.last_name.clone());
        active.position = Set(employee.position.clone());
        active.salary = Set(employee.salary);
        active.hire_date = Set(employee.hire_date.clone());
        active.contact_info = Set(employee.contact_info.clone());
        active.status = Set(employee.status.clone());
        active.updated_at = Set(Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update employee")?;

        Ok(Employee::from(model))
    }

    pub async fn soft_delete(&self, employee_id: &str) -> Result<bool> {
        let result = Employees::update_many()
            .col_expr(
                employees::Column::DeletedAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(employees::Column::EmployeeId.eq(employee_id))
            .filter(employees::Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to delete employee")?;

        Ok(result.rows_affected > 0)
    }
}
