//! Weather forecast tool over static city data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherInput {
    pub city: String,
}

/// Icon names understood by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherIcon {
    CloudSun,
    Sun,
    CloudRain,
    Cloud,
    Wind,
    Droplets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: String,
    pub condition: String,
    pub wind: String,
    pub humidity: String,
    pub icon: WeatherIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub temp: String,
    pub condition: String,
    pub icon: WeatherIcon,
}

/// Flow output: current conditions plus a 7-day forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub city: String,
    pub current: CurrentWeather,
    pub forecast: Vec<DailyForecast>,
}

type Day = (&'static str, &'static str, &'static str, WeatherIcon);

struct CityWeather {
    key: &'static str,
    city: &'static str,
    current: (&'static str, &'static str, &'static str, &'static str, WeatherIcon),
    week: [Day; 7],
}

const DEFAULT_CITY: &str = "pune";

#[rustfmt::skip]
const CITIES: &[CityWeather] = &[
    CityWeather {
        key: "pune",
        city: "Pune",
        current: ("31°C", "Partly Cloudy", "12 km/h", "55%", WeatherIcon::CloudSun),
        week: [
            ("Today", "31°C", "Partly Cloudy", WeatherIcon::CloudSun),
            ("Tuesday", "32°C", "Sunny", WeatherIcon::Sun),
            ("Wednesday", "30°C", "Rainy", WeatherIcon::CloudRain),
            ("Thursday", "33°C", "Sunny", WeatherIcon::Sun),
            ("Friday", "29°C", "Showers", WeatherIcon::CloudRain),
            ("Saturday", "31°C", "Cloudy", WeatherIcon::Cloud),
            ("Sunday", "32°C", "Partly Cloudy", WeatherIcon::CloudSun),
        ],
    },
    CityWeather {
        key: "mumbai",
        city: "Mumbai",
        current: ("32°C", "Humid & Cloudy", "18 km/h", "75%", WeatherIcon::Cloud),
        week: [
            ("Today", "32°C", "Humid & Cloudy", WeatherIcon::Cloud),
            ("Tuesday", "33°C", "Thunderstorms", WeatherIcon::CloudRain),
            ("Wednesday", "31°C", "Cloudy", WeatherIcon::Cloud),
            ("Thursday", "34°C", "Sunny", WeatherIcon::Sun),
            ("Friday", "32°C", "Showers", WeatherIcon::CloudRain),
            ("Saturday", "32°C", "Cloudy", WeatherIcon::Cloud),
            ("Sunday", "33°C", "Partly Cloudy", WeatherIcon::CloudSun),
        ],
    },
];

/// Looks up the forecast for `city`; unknown cities get Pune's forecast.
pub fn forecast_for_city(city: &str) -> WeatherForecast {
    let key = city.trim().to_lowercase();
    let entry = CITIES
        .iter()
        .find(|c| c.key == key)
        .or_else(|| CITIES.iter().find(|c| c.key == DEFAULT_CITY))
        .unwrap_or(&CITIES[0]);

    let (temperature, condition, wind, humidity, icon) = entry.current;
    WeatherForecast {
        city: entry.city.to_string(),
        current: CurrentWeather {
            temperature: temperature.to_string(),
            condition: condition.to_string(),
            wind: wind.to_string(),
            humidity: humidity.to_string(),
            icon,
        },
        forecast: entry
            .week
            .iter()
            .map(|(day, temp, condition, icon)| DailyForecast {
                day: day.to_string(),
                temp: temp.to_string(),
                condition: condition.to_string(),
                icon: *icon,
            })
            .collect(),
    }
}
