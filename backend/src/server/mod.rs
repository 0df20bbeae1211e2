//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, SiteSettings};

use state_builders::build_http_state;

use std::future::Future;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use pressroom::Trace;
use pressroom::inbound::http::health::{HealthState, live, ready};
use pressroom::inbound::http::routes;
use pressroom::inbound::http::session_config::SessionSettings;
use pressroom::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let pages = web::scope("")
        .wrap(session.middleware())
        .configure(routes::configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(pages)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// OS signals are left to the caller; see [`run_until_shutdown`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .disable_signals()
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Serve until `shutdown` resolves, then fail liveness and drain.
///
/// Liveness drops before the listener stops so probes see the drain while
/// in-flight requests finish.
///
/// # Errors
/// Propagates the server's I/O error, or a join failure of its task.
pub async fn run_until_shutdown<F>(
    server: Server,
    health_state: web::Data<HealthState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let handle = server.handle();
    let running = actix_web::rt::spawn(server);

    shutdown.await;
    info!("shutdown requested; draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;

    running.await.map_err(std::io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pressroom::domain::TRACE_ID_HEADER;
    use rstest::rstest;
    use std::net::SocketAddr;
    use tokio::sync::oneshot;

    fn session() -> SessionSettings {
        SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_probes_and_pages() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let config = ServerConfig::new(session(), "127.0.0.1:0".parse().expect("addr"));
        let app = test::init_service(build_app(AppDependencies {
            health_state,
            http_state: build_http_state(&config),
            session: config.session.clone(),
        }))
        .await;

        let probe =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(probe.status(), StatusCode::OK);

        let home = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(home.status(), StatusCode::OK);
        assert!(home.headers().contains_key(TRACE_ID_HEADER));
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_ready_and_shutdown_drains() {
        let health_state = web::Data::new(HealthState::new());
        let bind_addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");
        let server = create_server(health_state.clone(), ServerConfig::new(session(), bind_addr))
            .expect("server binds");
        assert!(health_state.is_ready());

        let (stop, stopped) = oneshot::channel::<()>();
        let serving = actix_web::rt::spawn(run_until_shutdown(
            server,
            health_state.clone(),
            async move {
                stopped.await.ok();
            },
        ));
        assert!(health_state.is_alive());

        stop.send(()).expect("shutdown receiver alive");
        serving
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
        assert!(!health_state.is_alive());
    }
}
