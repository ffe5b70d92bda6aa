use mongodb::Client;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, Credential, ServerAddress};

use crate::config::Connection;
use crate::errors::{AppError, Result};

/// Opens a client for `connection` and verifies connectivity by listing
/// database names. Handshake failures wrap the driver error.
pub async fn connect(connection: &Connection) -> Result<Client> {
    let address = ServerAddress::Tcp {
        host: connection.host.clone().unwrap_or_default(),
        port: connection.port,
    };

    let mut options = ClientOptions::default();
    options.hosts = vec![address];
    if connection.auth() {
        let mut credential = Credential::default();
        credential.username = connection.username.clone();
        credential.password = connection.password.clone();
        credential.source = connection.authdb.clone();
        options.credential = Some(credential);
    }

    let client = Client::with_options(options).map_err(AppError::ServerConnection)?;
    client
        .list_database_names()
        .await
        .map_err(AppError::ServerConnection)?;

    Ok(client)
}

pub async fn database_names(client: &Client) -> Result<Vec<String>> {
    client
        .list_database_names()
        .await
        .map_err(AppError::ServerConnection)
}

pub async fn collection_names(client: &Client, database: &str) -> Result<Vec<String>> {
    client
        .database(database)
        .list_collection_names()
        .await
        .map_err(AppError::ServerConnection)
}

pub async fn document_count(client: &Client, database: &str, collection: &str) -> Result<u64> {
    client
        .database(database)
        .collection::<Document>(collection)
        .count_documents(doc! {})
        .await
        .map_err(AppError::ServerConnection)
}
