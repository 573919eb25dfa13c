//! [`Project`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        project::{self, Coordinates},
        Project,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection, SearchPattern},
            Postgres,
        },
        Database,
    },
    read::project::Filter,
};

/// Columns of the `projects` table, in the order [`from_row()`] expects them.
const COLUMNS: &str = "\
    id, title, address, city, latitude, longitude, \
    market_sector, building_type, description, mini_description, \
    client, project_manager, status, compensation, year, \
    featured, recent, image_urls, created_at, updated_at";

/// Recomposes a [`Project`] out of a `projects` table [`Row`].
///
/// # Errors
///
/// If the stored coordinates are out of range.
fn from_row(row: &Row) -> Result<Project, Traced<database::Error>> {
    let (latitude, longitude) = (row.get("latitude"), row.get("longitude"));
    let coordinates = Coordinates::new(latitude, longitude)
        .ok_or(postgres::Error::InvalidCoordinates {
            latitude,
            longitude,
        })
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
    Ok(Project {
        id: row.get("id"),
        details: project::Details {
            title: row.get("title"),
            address: row.get("address"),
            city: row.get("city"),
            coordinates,
            market_sector: row.get("market_sector"),
            building_type: row.get("building_type"),
            description: row.get("description"),
            mini_description: row.get("mini_description"),
            client: row.get("client"),
            project_manager: row.get("project_manager"),
            status: row.get("status"),
            compensation: row.get("compensation"),
            year: row.get("year"),
            featured: row.get("featured"),
            recent: row.get("recent"),
            image_urls: row.get("image_urls"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl<C> Database<Select<By<Option<Project>, project::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Project>, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1::UUID");
        self.query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
    }
}

impl<C> Database<Select<By<Vec<Project>, Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Project>, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Filter {
            sectors,
            statuses,
            search,
        } = by.into_inner();
        let pattern = search.map(|s| SearchPattern::new(s.as_ref()));

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM projects \
             WHERE (CARDINALITY($1::INT2[]) = 0 \
                    OR market_sector = ANY($1::INT2[])) \
               AND (CARDINALITY($2::INT2[]) = 0 \
                    OR status = ANY($2::INT2[])) \
               AND ($3::VARCHAR IS NULL \
                    OR LOWER(title) LIKE $3::VARCHAR \
                    OR LOWER(city) LIKE $3::VARCHAR \
                    OR LOWER(client) LIKE $3::VARCHAR \
                    OR LOWER(description) LIKE $3::VARCHAR \
                    OR LOWER(building_type) LIKE $3::VARCHAR) \
             ORDER BY created_at DESC, id",
        );
        self.query(sql.as_str(), &[&sectors, &statuses, &pattern])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect()
    }
}

impl<C> Database<Lock<By<Project, project::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Project, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM projects \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<project::Details>> for Postgres<C>
where
    C: Connection,
{
    /// Stored [`Project`] with the assigned [`project::Id`] and timestamps.
    type Ok = Project;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(details): Insert<project::Details>,
    ) -> Result<Self::Ok, Self::Err> {
        let project::Details {
            title,
            address,
            city,
            coordinates,
            market_sector,
            building_type,
            description,
            mini_description,
            client,
            project_manager,
            status,
            compensation,
            year,
            featured,
            recent,
            image_urls,
        } = details;
        let (latitude, longitude) =
            (coordinates.latitude(), coordinates.longitude());

        let sql = format!(
            "INSERT INTO projects (\
                title, address, city, latitude, longitude, \
                market_sector, building_type, description, mini_description, \
                client, project_manager, status, compensation, year, \
                featured, recent, image_urls\
             ) \
             VALUES (\
                $1::VARCHAR, $2::VARCHAR, $3::VARCHAR, \
                $4::FLOAT8, $5::FLOAT8, \
                $6::INT2, $7::VARCHAR, $8::TEXT, $9::VARCHAR, \
                $10::VARCHAR, $11::VARCHAR, $12::INT2, $13::NUMERIC, \
                $14::INT4, \
                $15::BOOL, $16::BOOL, $17::VARCHAR[]\
             ) \
             RETURNING {COLUMNS}",
        );
        let row = self
            .query_opt(
                sql.as_str(),
                &[
                    &title,
                    &address,
                    &city,
                    &latitude,
                    &longitude,
                    &market_sector,
                    &building_type,
                    &description,
                    &mini_description,
                    &client,
                    &project_manager,
                    &status,
                    &compensation,
                    &year,
                    &featured,
                    &recent,
                    &image_urls,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::NotReturned)
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        from_row(&row)
    }
}

impl<C> Database<Insert<Vec<project::Details>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Insert<project::Details>,
        Ok = Project,
        Err = Traced<database::Error>,
    >,
{
    /// Stored [`Project`]s, in the provided order.
    type Ok = Vec<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(details): Insert<Vec<project::Details>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut stored = Vec::with_capacity(details.len());
        for d in details {
            stored.push(
                self.execute(Insert(d)).await.map_err(tracerr::wrap!())?,
            );
        }
        Ok(stored)
    }
}

impl<C> Database<Update<Project>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(project): Update<Project>,
    ) -> Result<Self::Ok, Self::Err> {
        let Project {
            id,
            details:
                project::Details {
                    title,
                    address,
                    city,
                    coordinates,
                    market_sector,
                    building_type,
                    description,
                    mini_description,
                    client,
                    project_manager,
                    status,
                    compensation,
                    year,
                    featured,
                    recent,
                    image_urls,
                },
            created_at,
            updated_at,
        } = project;
        let (latitude, longitude) =
            (coordinates.latitude(), coordinates.longitude());

        const SQL: &str = "\
            INSERT INTO projects (\
                id, title, address, city, latitude, longitude, \
                market_sector, building_type, description, mini_description, \
                client, project_manager, status, compensation, year, \
                featured, recent, image_urls, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::FLOAT8, $6::FLOAT8, \
                $7::INT2, $8::VARCHAR, $9::TEXT, $10::VARCHAR, \
                $11::VARCHAR, $12::VARCHAR, $13::INT2, $14::NUMERIC, \
                $15::INT4, \
                $16::BOOL, $17::BOOL, $18::VARCHAR[], \
                $19::TIMESTAMPTZ, $20::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                address = EXCLUDED.address, \
                city = EXCLUDED.city, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                market_sector = EXCLUDED.market_sector, \
                building_type = EXCLUDED.building_type, \
                description = EXCLUDED.description, \
                mini_description = EXCLUDED.mini_description, \
                client = EXCLUDED.client, \
                project_manager = EXCLUDED.project_manager, \
                status = EXCLUDED.status, \
                compensation = EXCLUDED.compensation, \
                year = EXCLUDED.year, \
                featured = EXCLUDED.featured, \
                recent = EXCLUDED.recent, \
                image_urls = EXCLUDED.image_urls, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &title,
                &address,
                &city,
                &latitude,
                &longitude,
                &market_sector,
                &building_type,
                &description,
                &mini_description,
                &client,
                &project_manager,
                &status,
                &compensation,
                &year,
                &featured,
                &recent,
                &image_urls,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Project, project::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Project, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM projects \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|n| n > 0)
    }
}

impl<C> Database<Delete<By<Vec<Project>, Vec<project::Id>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Project>, Vec<project::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(0);
        }

        const SQL: &str = "\
            DELETE FROM projects \
            WHERE id = ANY($1::UUID[])";
        self.exec(SQL, &[&ids]).await.map_err(tracerr::wrap!())
    }
}
