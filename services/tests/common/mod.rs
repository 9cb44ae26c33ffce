use std::net::SocketAddr;

use axum::Router;
use serde_json::{Value, json};

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    listener.local_addr().expect("local addr")
}

#[allow(dead_code)]
pub fn route_feature_collection(coordinates: Value) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": coordinates},
            "properties": {
                "ascent": 150.0,
                "descent": 20.0,
                "summary": {"distance": 15_432.0, "duration": 13_900.0},
                "extras": {
                    "surface": {"summary": [{"value": 12.0, "distance": 15_432.0, "amount": 100.0}]},
                    "waytype": {"summary": [{"value": 4.0, "distance": 15_432.0, "amount": 100.0}]}
                }
            }
        }]
    })
}
