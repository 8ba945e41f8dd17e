#[cfg(feature = "mcp")]
pub mod server {
    use anyhow::Result;
    use optik::{Engine, FormData, LensType, OptikError, PriorityPreset};
    use serde::{Deserialize, Serialize};
    use std::io::{self, BufRead, Write};
    use tracing::{debug, error, info};

    const PROTOCOL_VERSION: &str = "2024-11-05";
    const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    #[derive(Debug, Deserialize)]
    struct McpRequest {
        jsonrpc: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<serde_json::Value>,
        method: String,
        #[serde(default)]
        params: Option<serde_json::Value>,
    }

    #[derive(Debug, Serialize)]
    struct McpResponse {
        jsonrpc: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<McpError>,
    }

    #[derive(Debug, Serialize)]
    struct McpError {
        code: i32,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    }

    impl McpError {
        fn parse_error(message: String) -> Self {
            Self {
                code: -32700,
                message,
                data: None,
            }
        }

        fn invalid_request(message: String) -> Self {
            Self {
                code: -32600,
                message,
                data: None,
            }
        }

        fn method_not_found(method: String) -> Self {
            Self {
                code: -32601,
                message: format!("Method not found: {}", method),
                data: None,
            }
        }

        fn invalid_params(message: String) -> Self {
            Self {
                code: -32602,
                message,
                data: None,
            }
        }

        fn internal_error(message: String) -> Self {
            Self {
                code: -32603,
                message,
                data: None,
            }
        }

        /// Bad caller input is an invalid-params error, anything else is internal
        fn from_engine(context: &str, err: OptikError) -> Self {
            error!("{}: {}", context, err);
            let message = format!("{}: {}", context, err);
            match err {
                OptikError::Engine(_) => Self::internal_error(message),
                _ => Self::invalid_params(message),
            }
        }
    }

    struct McpServer {
        engine: Engine,
    }

    impl McpServer {
        fn new(engine: Engine) -> Self {
            Self { engine }
        }

        fn handle_request(&mut self, request: McpRequest) -> McpResponse {
            debug!("Handling request: method={}", request.method);

            if request.jsonrpc != "2.0" {
                return McpResponse {
                    jsonrpc: "2.0".to_string(),
                    id: request.id,
                    result: None,
                    error: Some(McpError::invalid_request(
                        "Invalid JSON-RPC version, expected '2.0'".to_string(),
                    )),
                };
            }

            let result = match request.method.as_str() {
                "initialize" => self.initialize(),
                "tools/list" => self.list_tools(),
                "tools/call" => self.call_tool(request.params),
                _ => Err(McpError::method_not_found(request.method)),
            };

            match result {
                Ok(result) => McpResponse {
                    jsonrpc: "2.0".to_string(),
                    id: request.id,
                    result: Some(result),
                    error: None,
                },
                Err(error) => McpResponse {
                    jsonrpc: "2.0".to_string(),
                    id: request.id,
                    result: None,
                    error: Some(error),
                },
            }
        }

        fn initialize(&self) -> Result<serde_json::Value, McpError> {
            info!("Initializing MCP server");
            Ok(serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": "optik-mcp-server",
                    "version": SERVER_VERSION
                },
                "capabilities": {
                    "tools": {}
                }
            }))
        }

        fn list_tools(&self) -> Result<serde_json::Value, McpError> {
            debug!("Listing tools");
            Ok(serde_json::json!({
                "tools": [
                    {
                        "name": "estimate_thickness",
                        "description": "Estimate center and edge thickness (mm) of a lens from its power, refractive index and diameter.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "power": {
                                    "type": "number",
                                    "description": "Lens power in diopters; negative for myopia, positive for hyperopia"
                                },
                                "index": {
                                    "type": "number",
                                    "description": "Refractive index, e.g. 1.50, 1.60, 1.67"
                                },
                                "diameter": {
                                    "type": "number",
                                    "description": "Effective lens diameter in mm (small 48, medium 52, large 56)"
                                },
                                "min_thickness": {
                                    "type": "number",
                                    "description": "Minimum glass thickness in mm",
                                    "default": 1.0
                                }
                            },
                            "required": ["power", "index", "diameter"]
                        }
                    },
                    {
                        "name": "estimate_improvement",
                        "description": "Percent thickness reduction of a lens index compared to a standard 1.50 lens.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "power": { "type": "number", "description": "Lens power in diopters" },
                                "index": { "type": "number", "description": "Refractive index to compare" },
                                "diameter": { "type": "number", "description": "Lens diameter in mm" }
                            },
                            "required": ["power", "index", "diameter"]
                        }
                    },
                    {
                        "name": "generate_recommendations",
                        "description": "Price and rank up to three lens packages for a calculator form. Lenses that need special manufacture are listed separately with their delivery time.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "prescription": {
                                    "type": "object",
                                    "description": "{ rightEye: { sph, cyl, axis }, leftEye: { sph, cyl, axis } }"
                                },
                                "frame": {
                                    "type": "object",
                                    "description": "{ size: small|medium|large, width?, height?, bridge? }"
                                },
                                "lensType": {
                                    "type": "string",
                                    "description": "single_vision, bifocal, progressive, multifocal, photochromic, blue_cut or anti_reflex"
                                },
                                "priority": {
                                    "type": "object",
                                    "description": "{ thickness, price, quality }, each 0-100"
                                },
                                "usage": {
                                    "type": "string",
                                    "description": "Free-text usage description, e.g. 'ofiste bilgisayar'"
                                },
                                "subsidyEligible": {
                                    "type": "boolean",
                                    "default": false
                                }
                            },
                            "required": ["prescription", "frame", "lensType", "priority"]
                        }
                    },
                    {
                        "name": "recommend_index",
                        "description": "Suggest a lens index for a total diopter value and a priority preset.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "total_diopter": { "type": "number" },
                                "priority": {
                                    "type": "string",
                                    "enum": ["thin", "cheap", "balanced"],
                                    "default": "balanced"
                                }
                            },
                            "required": ["total_diopter"]
                        }
                    },
                    {
                        "name": "recommend_coatings",
                        "description": "Suggest coatings from a free-text usage description and a lens type.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "usage": { "type": "string" },
                                "lens_type": { "type": "string", "default": "single_vision" }
                            },
                            "required": ["usage"]
                        }
                    },
                    {
                        "name": "show_rules",
                        "description": "Show the active rule tables (index rules, candidate bands, coating scenarios, prices) as JSON.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {}
                        }
                    }
                ]
            }))
        }

        fn call_tool(
            &mut self,
            params: Option<serde_json::Value>,
        ) -> Result<serde_json::Value, McpError> {
            let params =
                params.ok_or_else(|| McpError::invalid_params("Missing params".to_string()))?;

            let tool_name = params["name"]
                .as_str()
                .ok_or_else(|| McpError::invalid_params("Missing tool name".to_string()))?;

            let arguments = params
                .get("arguments")
                .ok_or_else(|| McpError::invalid_params("Missing arguments".to_string()))?;

            debug!("Calling tool: {}", tool_name);

            match tool_name {
                "estimate_thickness" => self.tool_estimate_thickness(arguments),
                "estimate_improvement" => self.tool_estimate_improvement(arguments),
                "generate_recommendations" => self.tool_generate_recommendations(arguments),
                "recommend_index" => self.tool_recommend_index(arguments),
                "recommend_coatings" => self.tool_recommend_coatings(arguments),
                "show_rules" => self.tool_show_rules(),
                _ => Err(McpError::invalid_params(format!(
                    "Unknown tool: {}",
                    tool_name
                ))),
            }
        }

        fn tool_estimate_thickness(
            &self,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, McpError> {
            let power = number(args, "power")?;
            let index = number(args, "index")?;
            let diameter = number(args, "diameter")?;
            let min_thickness = args["min_thickness"].as_f64();

            let result = self
                .engine
                .estimate_thickness(power, index, diameter, min_thickness)
                .map_err(|e| McpError::from_engine("Thickness estimate failed", e))?;

            Ok(text_content(format!(
                "Lens {:+.2} D in {:.2} material, {:.0} mm diameter\n\n- Center: {:.2} mm\n- Edge: {:.2} mm\n- Sag: {:.2} mm\n",
                power, index, diameter, result.center, result.edge, result.sag
            )))
        }

        fn tool_estimate_improvement(
            &self,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, McpError> {
            let power = number(args, "power")?;
            let index = number(args, "index")?;
            let diameter = number(args, "diameter")?;

            let percent = self
                .engine
                .estimate_improvement_percent(power, index, diameter)
                .map_err(|e| McpError::from_engine("Improvement estimate failed", e))?;

            Ok(text_content(format!(
                "A {:.2} lens is {:.1}% thinner than a 1.50 lens at {:+.2} D",
                index, percent, power
            )))
        }

        fn tool_generate_recommendations(
            &self,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, McpError> {
            let form: FormData = serde_json::from_value(args.clone()).map_err(|e| {
                McpError::invalid_params(format!("Invalid calculator form: {}", e))
            })?;

            let quote = self
                .engine
                .quote(&form)
                .map_err(|e| McpError::from_engine("Recommendation failed", e))?;

            let mut output = String::new();
            output.push_str(&format!(
                "Total power {:.2} D, suggested index {} ({})\n\n",
                quote.total_power, quote.suggested_index.index, quote.suggested_index.reason
            ));

            if quote.recommendations.is_empty() {
                output.push_str("No stock lenses available for this prescription.\n");
            } else {
                output.push_str("## Recommendations\n\n");
                for (i, r) in quote.recommendations.iter().enumerate() {
                    let coatings: Vec<&str> = r.coatings.iter().map(|c| c.id()).collect();
                    output.push_str(&format!(
                        "{}. **{}**: {:.2} mm, {} {}, rating {:.1}, total {}",
                        i + 1,
                        r.lens_index,
                        r.thickness,
                        r.category,
                        r.risk.label(),
                        r.rating,
                        r.total_price
                    ));
                    if !coatings.is_empty() {
                        output.push_str(&format!(" (coatings: {})", coatings.join(", ")));
                    }
                    output.push('\n');
                }
            }

            if !quote.special_orders.is_empty() {
                output.push_str("\n## Special orders\n\n");
                for special in &quote.special_orders {
                    output.push_str(&format!(
                        "- **{}**: {} to {} days, total {}\n",
                        special.lens_index,
                        special.special_order.min_days,
                        special.special_order.max_days,
                        special.total_price
                    ));
                }
            }

            info!(
                "Generated {} recommendation(s), {} special order(s)",
                quote.recommendations.len(),
                quote.special_orders.len()
            );

            Ok(text_content(output))
        }

        fn tool_recommend_index(
            &self,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, McpError> {
            let total_diopter = number(args, "total_diopter")?;
            let preset = match args["priority"].as_str() {
                Some(priority) => priority
                    .parse::<PriorityPreset>()
                    .map_err(|e| McpError::invalid_params(e.to_string()))?,
                None => PriorityPreset::default(),
            };

            let suggestion = self
                .engine
                .recommend_index(total_diopter, preset)
                .map_err(|e| McpError::from_engine("Index recommendation failed", e))?;

            Ok(text_content(format!(
                "Recommended index: {} ({})\n\nReason: {}",
                suggestion.index,
                suggestion.index.label(),
                suggestion.reason
            )))
        }

        fn tool_recommend_coatings(
            &self,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, McpError> {
            let usage = args["usage"]
                .as_str()
                .ok_or_else(|| McpError::invalid_params("Missing 'usage' field".to_string()))?;
            let lens_type = match args["lens_type"].as_str() {
                Some(lens_type) => lens_type
                    .parse::<LensType>()
                    .map_err(|e| McpError::invalid_params(e.to_string()))?,
                None => LensType::SingleVision,
            };

            let coatings = self
                .engine
                .recommend_coatings(usage, lens_type)
                .map_err(|e| McpError::from_engine("Coating recommendation failed", e))?;

            let output = if coatings.is_empty() {
                "No coatings suggested for this usage.".to_string()
            } else {
                let mut s = format!("## Suggested coatings ({})\n\n", coatings.len());
                for coating in &coatings {
                    s.push_str(&format!(
                        "- **{}**: {}, {}\n",
                        coating.id(),
                        coating.label(),
                        self.engine.tables().coating_price(*coating)
                    ));
                }
                s
            };

            Ok(text_content(output))
        }

        fn tool_show_rules(&self) -> Result<serde_json::Value, McpError> {
            let json = self
                .engine
                .tables()
                .to_json_pretty()
                .map_err(|e| McpError::from_engine("Failed to show rules", e))?;
            Ok(text_content(json))
        }
    }

    fn number(args: &serde_json::Value, field: &str) -> Result<f64, McpError> {
        args[field]
            .as_f64()
            .ok_or_else(|| McpError::invalid_params(format!("Missing number '{}'", field)))
    }

    fn text_content(text: String) -> serde_json::Value {
        serde_json::json!({
            "content": [{
                "type": "text",
                "text": text
            }]
        })
    }

    pub fn start_server(engine: Engine) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "optik_mcp=info".into()),
            )
            .with_writer(io::stderr)
            .init();

        info!("Starting Optik MCP server v{}", SERVER_VERSION);
        info!("Protocol version: {}", PROTOCOL_VERSION);

        let mut server = McpServer::new(engine);
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let response = match serde_json::from_str::<McpRequest>(&line) {
                Ok(request) => server.handle_request(request),
                Err(e) => {
                    error!("Parse error: {}", e);
                    McpResponse {
                        jsonrpc: "2.0".to_string(),
                        id: None,
                        result: None,
                        error: Some(McpError::parse_error(format!("Parse error: {}", e))),
                    }
                }
            };

            let response_json = serde_json::to_string(&response)?;
            writeln!(stdout, "{}", response_json)?;
            stdout.flush()?;

            debug!("Sent response");
        }

        info!("MCP server shutting down");
        Ok(())
    }

}

#[cfg(not(feature = "mcp"))]
pub mod server {
    use anyhow::Result;
    use optik::Engine;

    pub fn start_server(_engine: Engine) -> Result<()> {
        anyhow::bail!("MCP feature not enabled. Recompile with --features mcp")
    }
}
