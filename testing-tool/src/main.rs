use anyhow::{anyhow, Result};
use colored::*;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

struct Session {
    client: Client,
    base_url: String,
    token: String,
}

impl Session {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        let line = format!("{} {} -> {}", method, path, status);
        if status.is_success() {
            println!("{}", line.bright_green());
        } else {
            println!("{}", line.bright_red());
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok((status, body))
    }
}

fn prompt(label: &str, default: &str) -> Result<String> {
    print!("{}", format!("{} [{}]: ", label, default).bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    let value = value.trim();
    Ok(if value.is_empty() { default.to_string() } else { value.to_string() })
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 Fleet Dispatch Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = prompt("URL del servidor", "http://localhost:5000")?;
    let email = prompt("Email", "admin@local")?;
    let password = prompt("Password", "admin123")?;

    let session = authenticate(base_url, &email, &password).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🚗 Listar vehículos");
        println!("2. 📋 Listar solicitudes");
        println!("3. 🔁 Recorrer una solicitud planned → in-progress → done");
        println!("4. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-4): ".bright_yellow());
        io::stdout().flush()?;

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;

        match choice.trim() {
            "1" => print_list(&session, "/api/vehicles").await?,
            "2" => print_list(&session, "/api/requests").await?,
            "3" => {
                if let Err(e) = walk_request(&session).await {
                    println!("{}", format!("❌ {}", e).bright_red());
                }
            }
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    Ok(())
}

async fn authenticate(base_url: String, email: &str, password: &str) -> Result<Session> {
    println!();
    println!("{}", "🔐 AUTENTICANDO...".bright_cyan().bold());

    let client = Client::new();
    let response = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(anyhow!("login falló ({}): {}", status, body["message"]));
    }

    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow!("respuesta de login sin token"))?
        .to_string();
    println!(
        "{}",
        format!("✅ Sesión iniciada como {} ({})", body["user"]["email"], body["user"]["role"]).bright_green()
    );

    Ok(Session { client, base_url, token })
}

async fn print_list(session: &Session, path: &str) -> Result<()> {
    let (_, body) = session.send(Method::GET, path, None).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn id_of(value: &Value) -> Result<String> {
    value["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("respuesta sin id: {}", value))
}

/// Crea conductor y solicitud, y lleva la solicitud hasta `done`
/// mostrando el estado del vehículo y los viajes en cada paso
async fn walk_request(session: &Session) -> Result<()> {
    let (_, vehicles) = session.send(Method::GET, "/api/vehicles", None).await?;
    let vehicle = vehicles
        .as_array()
        .and_then(|list| list.iter().find(|v| v["status"] == "base"))
        .ok_or_else(|| anyhow!("no hay vehículos en base"))?;
    let vehicle_id = id_of(vehicle)?;

    let (_, driver) = session
        .send(
            Method::POST,
            "/api/drivers",
            Some(json!({ "firstName": "Тест", "lastName": "Водій", "licenseNumber": "TEST-0001" })),
        )
        .await?;
    let driver_id = id_of(&driver)?;

    let (_, request) = session
        .send(
            Method::POST,
            "/api/requests",
            Some(json!({ "vehicleId": vehicle_id, "driverId": driver_id, "from": "Base", "to": "Field" })),
        )
        .await?;
    let request_id = id_of(&request)?;

    for status in ["in-progress", "done"] {
        println!();
        println!("{}", format!("➡️  {}", status).bright_cyan().bold());
        session
            .send(Method::PUT, &format!("/api/requests/{}", request_id), Some(json!({ "status": status })))
            .await?;
        let (_, vehicle) = session.send(Method::GET, &format!("/api/vehicles/{}", vehicle_id), None).await?;
        println!("🚗 Estado del vehículo: {}", vehicle["status"].to_string().bright_white().bold());
        let (_, trips) = session
            .send(Method::GET, &format!("/api/trips?vehicleId={}", vehicle_id), None)
            .await?;
        for trip in trips.as_array().into_iter().flatten() {
            println!("   🛣️ {}", trip["notes"]);
        }
    }

    Ok(())
}
